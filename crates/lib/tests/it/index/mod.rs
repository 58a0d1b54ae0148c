//! SortIndex integration tests
//!
//! Every test builds the cartoons fixture on the TEST_BACKEND store and drives
//! the public index API the way an application inserting rows would.

mod derive;
mod rebuild;
