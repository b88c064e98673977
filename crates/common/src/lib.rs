pub mod types;
pub mod env;
pub mod serde_ext;

pub mod utils {
    pub mod logging;
}
