pub mod classes;
pub mod enrollments;
pub mod ids;
pub mod members;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    CapacityRow, Class, ClassUpdate, Enrollment, EnrollmentOutcome, Member, MemberUpdate,
    SubscriptionType,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
