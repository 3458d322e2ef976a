use async_trait::async_trait;
use mockall::mock;

use community_feed::application::ports::document_gateway::{
    ChangeCallback, DocumentGateway, DocumentSubscription, GatewayError,
};
use community_feed::domain::entities::{Post, VoteEntry};
use community_feed::domain::value_objects::{
    OptionKind, OrderSpec, PostId, ScopeId, UserId, VoteValue,
};

mock! {
    pub DocumentGatewayPort {}

    #[async_trait]
    impl DocumentGateway for DocumentGatewayPort {
        async fn query_posts(
            &self,
            scope: &ScopeId,
            order: &OrderSpec,
            limit: usize,
        ) -> Result<Vec<Post>, GatewayError>;
        async fn query_votes(
            &self,
            voter_id: &UserId,
            post_ids: &[PostId],
        ) -> Result<Vec<VoteEntry>, GatewayError>;
        async fn write_vote(
            &self,
            post_id: &PostId,
            voter_id: &UserId,
            value: VoteValue,
        ) -> Result<(), GatewayError>;
        async fn write_option(
            &self,
            post_id: &PostId,
            kind: OptionKind,
            value: bool,
        ) -> Result<(), GatewayError>;
        async fn subscribe_document(
            &self,
            doc_path: &str,
            on_change: ChangeCallback,
        ) -> Result<DocumentSubscription, GatewayError>;
    }
}

pub type MockDocumentGateway = MockDocumentGatewayPort;
