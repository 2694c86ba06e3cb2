pub mod classify;
pub mod pagination;
pub mod service;
pub mod term;

pub use crate::domain::model::{
    Assignment, AssignmentReport, Course, RawRecord, Term, TermSummary, UpcomingView,
};
pub use crate::domain::ports::{CanvasClient, Page, Presenter, QueryParam};
pub use crate::utils::error::Result;
