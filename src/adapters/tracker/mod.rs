//! Issue tracker adapters - Implementations of the IssueTracker port.

mod mock_tracker;
mod youtrack_client;

pub use mock_tracker::MockIssueTracker;
pub use youtrack_client::{YouTrackClient, YouTrackConfig};
