pub mod prelude;

pub mod devices;
pub mod grant_on_device;
pub mod grants;
pub mod scopes;
pub mod user_on_device;
pub mod user_on_scope;
pub mod users;
