use async_trait::async_trait;

pub const CONFIRM_DELETE: &str = "Are you sure to delete?";
pub const MUTATION_FAILED: &str = "Something went wrong!";

/// Blocking dialogs: the caller waits until the user answers
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Yes/no question. Anything but an explicit yes is a no.
    async fn confirm(&self, message: &str) -> bool;

    /// Modal alert, returns once acknowledged
    async fn alert(&self, message: &str);
}
