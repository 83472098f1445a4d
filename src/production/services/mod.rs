//! Application services for production entities.

mod production;

pub use production::{
    NewHolder, NewHolderRequest, ProductionService, ProductionServiceError,
    ProductionServiceResult, Registration,
};
