mod engine;
mod pojo;
mod registry;
mod sub_pojo;

pub use porm_conn as conn;
pub use porm_error as error;
pub use porm_query as query;

pub use engine::PojoEngine;
pub use pojo::{Pojo, PojoBuilder};
pub use registry::Registry;
pub use sub_pojo::{Junction, SubPojoBuilder, SubPojoDefinition};
