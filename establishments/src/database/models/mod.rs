pub mod category;
pub mod establishment;
pub mod establishment_tag;
pub mod tag;

pub use category::{Category, Id as CategoryId};
pub use establishment::{Establishment, Id as EstablishmentId};
pub use establishment_tag::EstablishmentTag;
pub use tag::{Id as TagId, Tag};

type Id = i32;
