mod login;
mod password;
mod register;
mod service;
mod token;

pub use login::LoginUserCommand;
pub use register::RegisterUserCommand;
pub use service::UserCommandService;
