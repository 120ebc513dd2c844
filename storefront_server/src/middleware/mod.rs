mod staff;

pub use staff::{StaffOnlyFactory, StaffOnlyService};
