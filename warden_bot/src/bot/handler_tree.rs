use anyhow::Result;
use teloxide::{
    dispatching::{DpHandlerDescription, HandlerExt, UpdateFilterExt},
    dptree::{self, Handler},
    types::Update,
};
use warden_core::helpers::bot_commands::Command;

use crate::bot::answers::answers;

/// Long-polling dispatch tree. Webhook updates take the same path through `handle_update`.
pub fn handler_tree() -> Handler<'static, Result<()>, DpHandlerDescription> {
    dptree::entry().branch(
        Update::filter_message().branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(answers),
        ),
    )
}
