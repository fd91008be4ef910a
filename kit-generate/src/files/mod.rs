//! The Go artifacts written into a new service directory.

mod config_go;
mod model_go;
mod postgres_go;
mod service_go;
mod utils_go;

pub use config_go::{ConfigGo, StatusYml};
pub use model_go::{BaseModelGo, PostgresModelGo};
pub use postgres_go::{DbGo, PostgresConfigGo};
pub use service_go::ServiceGo;
pub use utils_go::{ConstantGo, StatusGo, UtilsGo};

use kitgen_codegen::ast::{GoType, Param};

/// `ctx context.Context`
fn ctx_param() -> Param {
    Param::new("ctx", GoType::qual("context", "Context"))
}

/// `err error`
fn err_result() -> Param {
    Param::new("err", GoType::error())
}
