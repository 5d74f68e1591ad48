pub use super::devices::Entity as Devices;
pub use super::grant_on_device::Entity as GrantOnDevice;
pub use super::grants::Entity as Grants;
pub use super::scopes::Entity as Scopes;
pub use super::user_on_device::Entity as UserOnDevice;
pub use super::user_on_scope::Entity as UserOnScope;
pub use super::users::Entity as Users;
