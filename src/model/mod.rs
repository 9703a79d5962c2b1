pub mod user;

pub use user::{
    AccountId, AccountProfile, Role, StaffProfile, StudentProfile, UserAccount, UserPatch,
};
