use crate::commands::error::{CommandResult, DefinitionError, RuntimeError};
use crate::commands::{argument::Argument, context::ExecutionContext, definition::CommandBuilder};
use crate::session::Session;

pub(super) fn register_commands(
    session: &mut Session,
    admin_tag: &str,
) -> Result<(), DefinitionError> {
    fn exec_build_border(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let side_length = ctx.get_number("sideLength")?;
        if side_length.fract() != 0.0 {
            return Err(RuntimeError::Message(format!(
                "The side length must be a whole number, got {}.",
                side_length
            ))
            .into());
        }

        let center = ctx.player()?.pos;
        let recipient = ctx.recipient()?;
        let game = &mut *ctx.game;
        // `as` saturates, so oversized values still fail the builder's limit check.
        game.tag_area
            .build(center, side_length as i32, &mut game.scheduler)?;
        game.set_area_observer(recipient);
        ctx.reply(&format!(
            "Building a border with a side length of {} around {}.",
            side_length, center
        ))
    }

    fn exec_reset_border(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let recipient = ctx.recipient()?;
        let game = &mut *ctx.game;
        game.tag_area.reset(&mut game.scheduler)?;
        game.set_area_observer(recipient);
        ctx.reply("Resetting the border.")
    }

    fn exec_get_tag_area(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let snapshot = ctx.game.tag_area.snapshot();
        ctx.reply(&snapshot.to_string())
    }

    session.register_command(
        CommandBuilder::new("BuildBorder")?
            .with_description("Build the border around your position")
            .with_group("tag")
            .with_aliases(["bb"])
            .with_permission(admin_tag)
            .with_argument(
                Argument::number("sideLength").description("Blocks per edge, greater than 2"),
            )?
            .build(),
        exec_build_border,
    );

    session.register_command(
        CommandBuilder::new("ResetBorder")?
            .with_description("Reset the border")
            .with_group("tag")
            .with_aliases(["rb"])
            .with_permission(admin_tag)
            .build(),
        exec_reset_border,
    );

    session.register_command(
        CommandBuilder::new("GetTagArea")?
            .with_description("Get tag area data")
            .with_group("tag")
            .with_aliases(["gta"])
            .with_permission(admin_tag)
            .build(),
        exec_get_tag_area,
    );

    Ok(())
}
