use crate::session::Context;

/// Handles the TYPE FTP command.
///
/// Both types are acknowledged; bytes always travel unchanged.
pub fn handle_type_command(ctx: &mut Context<'_>, arg: &str) {
    match arg {
        "A" => ctx.reply("200 TYPE is now ASCII"),
        "I" => ctx.reply("200 TYPE is now 8-bit binary"),
        _ => ctx.reply("504 Unknown TYPE"),
    }
}
