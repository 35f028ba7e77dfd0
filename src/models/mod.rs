mod entry;
mod outcome;

pub use entry::{Annotation, Entry, FeedFetchResult};
pub use outcome::{EntryOutcome, RunReport};
