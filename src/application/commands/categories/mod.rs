mod create;
mod service;

pub use create::CreateCategoryCommand;
pub use service::CategoryCommandService;
