mod core;
mod tag_area;

use crate::commands::{
    argument::Argument,
    context::ExecutionContext,
    definition::CommandBuilder,
    error::{CommandResult, DefinitionError, RuntimeError},
    usage,
};
use crate::session::Session;

pub fn register_commands(session: &mut Session) -> Result<(), DefinitionError> {
    let admin_tag = session.game.admin_tag.clone();
    core::register_commands(session, &admin_tag)?;
    tag_area::register_commands(session, &admin_tag)?;

    register_help(session)
}

fn register_help(session: &mut Session) -> Result<(), DefinitionError> {
    fn exec_help_command(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let command = ctx
            .args()
            .and_then(|args| args.get_string("command"))
            .transpose()?;
        let prefix = ctx.prefix();
        let registry = ctx.registry();

        match command {
            None => {
                let summaries = registry
                    .definitions(None)
                    .into_iter()
                    .filter(|definition| {
                        definition
                            .permissions()
                            .iter()
                            .all(|permission| ctx.has_permission(permission))
                    })
                    .map(|definition| usage::generate_summary(prefix, definition))
                    .collect::<Vec<_>>();

                ctx.reply("Available commands:")?;
                for summary in summaries {
                    ctx.reply(&format!(" {}", summary))?;
                }
                ctx.reply(&format!(
                    "Run {}Help <command> for more information.",
                    prefix
                ))?;
            }
            Some(name) => {
                let Some(definition) = registry.definitions(Some(name.as_str())).into_iter().next() else {
                    return Err(RuntimeError::UnknownCommand { name }.into());
                };
                for line in usage::generate_details(prefix, definition) {
                    ctx.reply(&line)?;
                }
            }
        }
        Ok(())
    }

    let definition = CommandBuilder::new("Help")?
        .with_description("Shows all available commands, or the details of one")
        .with_aliases(["h", "?"])
        .with_argument(Argument::string("command").description("Command name"))?
        .with_empty_argument_set(Some("List"))?
        .with_complete_argument_set(Some("Details"))?
        .build();
    session.register_command(definition, exec_help_command);
    Ok(())
}
