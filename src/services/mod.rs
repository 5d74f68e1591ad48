pub mod device_service;
pub mod device_service_impl;
pub mod user_service;
pub mod user_service_impl;

pub use device_service::{DeviceError, DeviceService, RegisterDevice};
pub use device_service_impl::SeaOrmDeviceService;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
