use super::{UserCommandService, password::validate_password};
use crate::{
    application::{
        dto::AuthPayloadDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        errors::DomainError,
        user::{DisplayName, Email, NewUser, PasswordHash, Role, User},
    },
};

pub struct RegisterUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserCommandService {
    /// Create an account and sign it in. The first account ever created is
    /// made an administrator.
    pub async fn register(&self, command: RegisterUserCommand) -> ApplicationResult<AuthPayloadDto> {
        if [&command.name, &command.email, &command.password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ApplicationError::validation(
                "Please provide name, email and password",
            ));
        }

        let name = DisplayName::new(command.name)?;
        let email = Email::new(command.email)?;
        validate_password(&command.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::validation("User already exists"));
        }

        let role = if self.user_repo.count().await? == 0 {
            Role::Admin
        } else {
            Role::User
        };

        let user = self
            .create_and_insert_user(name, email, &command.password, role)
            .await?;
        tracing::info!(user_id = i64::from(user.id), role = %user.role, "user registered");

        self.issue_auth_payload(user).await
    }

    async fn create_and_insert_user(
        &self,
        name: DisplayName,
        email: Email,
        password: &str,
        role: Role,
    ) -> ApplicationResult<User> {
        let hashed = self.password_hasher.hash(password).await?;
        let password_hash = PasswordHash::new(hashed)?;

        let new_user = NewUser::new(name, email, password_hash, role, self.clock.now());
        // a concurrent registration can still win the race for the address
        self.user_repo.insert(new_user).await.map_err(|err| match err {
            DomainError::DuplicateKey { ref field } if field == "email" => {
                ApplicationError::validation("User already exists")
            }
            other => other.into(),
        })
    }
}
