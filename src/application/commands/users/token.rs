use super::UserCommandService;
use crate::{
    application::{
        dto::{AuthPayloadDto, TokenSubject},
        error::ApplicationResult,
    },
    domain::user::User,
};

impl UserCommandService {
    pub(super) async fn issue_auth_payload(&self, user: User) -> ApplicationResult<AuthPayloadDto> {
        let subject = TokenSubject {
            user_id: user.id,
            name: user.name.to_string(),
            role: user.role,
            capabilities: user.role.default_capabilities(),
        };
        let token = self.token_manager.issue(subject).await?;
        Ok(AuthPayloadDto::new(token, user.into()))
    }
}
