//! Interactive confirmation seam.
//!
//! Deleting a product is the one admin action that asks first. The front end
//! supplies the prompt implementation; tests and `--yes` use
//! [`AlwaysConfirm`].

/// Question asked before a product is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

/// Blocking yes/no prompt.
pub trait Confirm {
    /// Ask `prompt`; `true` means go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
