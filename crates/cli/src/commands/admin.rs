//! Admin catalog commands.
//!
//! # Usage
//!
//! ```bash
//! tienda admin list
//! tienda admin create --name Mate --description Calabaza --price 10 --stock 5 --image-url https://img.example/mate.png
//! tienda admin update 3 --price 12.50
//! tienda admin delete 3 --yes
//! ```
//!
//! Every command needs a token with admin rights; the server enforces it.

use std::io::{BufRead, Write};

use tienda_admin::{AdminCatalogEditor, AlwaysConfirm, Confirm, DeleteOutcome, EditorError};
use tienda_core::{Price, ProductDraft, ProductId};

use super::{Context, Result};
use crate::render;

/// Field overrides for `admin update`; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

impl ProductChanges {
    fn apply(self, draft: &mut ProductDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(stock) = self.stock {
            draft.stock = stock;
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
    }
}

/// Asks on the terminal. Anything but `y`/`yes` declines.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = std::io::stdout();
        if write!(stdout, "{prompt} [y/N] ").and_then(|()| stdout.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn editor(ctx: &Context) -> AdminCatalogEditor {
    AdminCatalogEditor::new(ctx.client.clone(), ctx.storage.clone())
}

fn alert_on_signed_out(err: &EditorError) {
    if matches!(err, EditorError::NotSignedIn) {
        render::alert("Sign in with an admin token first.");
    }
}

pub async fn list(ctx: &Context) -> Result<()> {
    let mut editor = editor(ctx);
    let loaded = editor.mount().await;

    render::product_table(editor.products());
    Ok(loaded?)
}

pub async fn create(ctx: &Context, draft: &ProductDraft) -> Result<()> {
    let mut editor = editor(ctx);
    editor.open_add();

    if let Err(e) = editor.create(draft).await {
        alert_on_signed_out(&e);
        if let EditorError::Draft(reason) = &e {
            render::alert(&reason.to_string());
        }
        return Err(e.into());
    }

    render::product_table(editor.products());
    Ok(())
}

pub async fn update(ctx: &Context, id: ProductId, changes: ProductChanges) -> Result<()> {
    let mut editor = editor(ctx);
    editor.mount().await?;

    let mut draft = ProductDraft::from(editor.open_edit(id)?);
    changes.apply(&mut draft);

    if let Err(e) = editor.update(id, &draft).await {
        alert_on_signed_out(&e);
        if let EditorError::Draft(reason) = &e {
            render::alert(&reason.to_string());
        }
        return Err(e.into());
    }

    render::product_table(editor.products());
    Ok(())
}

pub async fn delete(ctx: &Context, id: ProductId, yes: bool) -> Result<()> {
    let mut editor = editor(ctx);
    let confirm: &dyn Confirm = if yes { &AlwaysConfirm } else { &TerminalConfirm };

    match editor.delete(id, confirm).await {
        Ok(DeleteOutcome::Deleted) => {
            render::product_table(editor.products());
            Ok(())
        }
        Ok(DeleteOutcome::Declined) => {
            render::notice("Nothing deleted.");
            Ok(())
        }
        Err(e) => {
            alert_on_signed_out(&e);
            Err(e.into())
        }
    }
}
