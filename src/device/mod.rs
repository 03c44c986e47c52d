pub(crate) mod composite;
pub(crate) mod virtual_device;
