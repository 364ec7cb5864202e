use crate::session::Context;

const FEATURES: [&str; 6] = [
    "MLST type*;modify*;size*;",
    "MLSD",
    "MDTM",
    "MFMT",
    "SIZE",
    "SITE FREE",
];

/// Handles the FEAT command (RFC 2389). Answered before login too.
pub fn handle_feat_command(ctx: &mut Context<'_>, _arg: &str) {
    ctx.reply("211-Extensions supported:");
    for feature in FEATURES {
        ctx.reply(format!(" {}", feature));
    }
    ctx.reply("211 End.");
}
