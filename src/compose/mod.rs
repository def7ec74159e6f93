pub(crate) mod blur;
pub(crate) mod composite;
pub mod compositor;
pub mod crop;
pub mod encode;
pub mod filters;
pub mod options;
pub mod overlay;
pub mod surface;
