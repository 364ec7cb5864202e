use crate::session::Context;
use log::error;

const MEGABYTE: u64 = 1024 * 1024;

/// Reports free space and capacity of the served volume in MB.
pub fn handle_free_command(ctx: &mut Context<'_>) {
    let space = ctx
        .storage
        .free_space()
        .and_then(|free| Ok((free, ctx.storage.capacity()?)));
    match space {
        Ok((free, capacity)) => ctx.reply(format!(
            "200 {} MB free of {} MB capacity",
            free / MEGABYTE,
            capacity / MEGABYTE
        )),
        Err(e) => {
            error!("Failed to get free space: {}", e);
            ctx.reply("500 Unable to retrieve free space");
        }
    }
}
