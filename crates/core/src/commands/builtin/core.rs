use crate::commands::error::{CommandResult, DefinitionError};
use crate::commands::{argument::Argument, context::ExecutionContext, definition::CommandBuilder};
use crate::session::Session;
use tracing::info;

pub(super) fn register_commands(
    session: &mut Session,
    admin_tag: &str,
) -> Result<(), DefinitionError> {
    fn exec_get_debug(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let is_debug = ctx.game.debug;
        ctx.reply(&format!("Debug mode is {}", is_debug))
    }

    fn exec_set_debug(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let is_debug = ctx.get_boolean("isDebug")?;
        ctx.game.debug = is_debug;
        info!("Debug mode set to {}", is_debug);
        if is_debug {
            let recipient = ctx.recipient()?;
            ctx.game.set_area_observer(recipient);
        }
        ctx.reply(&format!("Debug mode is {}", is_debug))
    }

    session.register_command(
        CommandBuilder::new("GetDebug")?
            .with_description("Get the debug flag")
            .with_aliases(["gd"])
            .with_permission(admin_tag)
            .build(),
        exec_get_debug,
    );

    session.register_command(
        CommandBuilder::new("SetDebug")?
            .with_description("Set the debug flag")
            .with_aliases(["sd"])
            .with_permission(admin_tag)
            .with_argument(
                Argument::boolean("isDebug").description("Mirror background progress to chat"),
            )?
            .build(),
        exec_set_debug,
    );

    Ok(())
}
