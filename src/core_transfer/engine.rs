use crate::core_network::data_channel::{data_connect, data_connected, ConnectProgress};
use crate::core_storage::storage::StorageFile;
use crate::core_transfer::listing::format_entry;
use crate::core_transfer::transfer::{ListFormat, TransferKind, TransferStage};
use crate::session::Context;
use log::{debug, error, info, warn};
use std::io::{Read, Write};

/// Replies 425 and returns `true` when a transfer is already in flight.
pub fn refuse_if_busy(ctx: &mut Context<'_>) -> bool {
    if ctx.session.transfer.is_closed() {
        return false;
    }
    debug!("Refusing a second transfer while {:?}", ctx.session.transfer.stage);
    ctx.reply("425 Transfer already in progress");
    true
}

/// Enters `Connecting` and makes a first attempt at the data socket.
/// A passive client that is not there yet, or an active connect still in
/// its handshake, gets polled until the connect deadline.
pub fn begin_transfer(
    ctx: &mut Context<'_>,
    kind: TransferKind,
    file: Option<Box<dyn StorageFile>>,
    path: String,
) {
    if refuse_if_busy(ctx) {
        return;
    }
    debug!("Preparing {:?} of {}", kind, path);
    let deadline = ctx.now + ctx.config.server.data_connect_timeout();
    ctx.session.transfer.prepare(kind, file, path, deadline);
    connect_step(ctx);
}

/// Advances the current transfer by one chunk, entry or connect attempt.
/// Returns whether anything happened.
pub fn step(ctx: &mut Context<'_>) -> bool {
    match ctx.session.transfer.stage {
        TransferStage::Closed => false,
        TransferStage::Connecting(_) => connect_step(ctx),
        TransferStage::Running(TransferKind::Retrieve) => retrieve_step(ctx),
        TransferStage::Running(TransferKind::Store) => store_step(ctx),
        TransferStage::Running(TransferKind::List(format)) => list_step(ctx, format),
    }
}

/// Drops any transfer in flight. Replies 426 only when there was one.
pub fn abort_transfer(ctx: &mut Context<'_>) -> bool {
    if ctx.session.transfer.is_closed() {
        return false;
    }
    info!("Transfer of {} aborted", ctx.session.transfer.path);
    abandon(ctx);
    ctx.reply("426 Transfer aborted");
    true
}

fn abandon(ctx: &mut Context<'_>) {
    ctx.session.transfer.release();
    ctx.transport.close_data();
}

fn connect_step(ctx: &mut Context<'_>) -> bool {
    match data_connect(ctx) {
        Some(ConnectProgress::Connected) => {
            start_running(ctx);
            true
        }
        Some(ConnectProgress::Pending) => {
            let expired = ctx
                .session
                .transfer
                .connect_deadline
                .map_or(true, |deadline| ctx.now >= deadline);
            if !expired {
                return false;
            }
            warn!("No data connection before the deadline");
            ctx.reply("425 No data connection");
            abandon(ctx);
            true
        }
        None => {
            abandon(ctx);
            true
        }
    }
}

fn start_running(ctx: &mut Context<'_>) {
    let Some(kind) = ctx.session.transfer.kind() else {
        return;
    };
    let port = ctx.session.data.port(ctx.config.server.pasv_port);

    match kind {
        TransferKind::Retrieve => {
            let size = ctx
                .session
                .transfer
                .file
                .as_ref()
                .map_or(Ok(0), |file| file.size())
                .unwrap_or(0);
            ctx.reply(format!("150-Connected to port {}", port));
            ctx.reply(format!("150 {} bytes to download", size));
        }
        TransferKind::Store => {
            ctx.reply(format!("150 Accepted data connection to port {}", port));
        }
        TransferKind::List(_) => {
            let path = ctx.session.transfer.path.clone();
            match ctx.storage.open_dir(&path) {
                Ok(cursor) => ctx.session.transfer.cursor = Some(cursor),
                Err(e) => {
                    warn!("Failed to open directory {}: {}", path, e);
                    ctx.reply(format!("550 Can't open directory {}", path));
                    abandon(ctx);
                    return;
                }
            }
            ctx.reply(format!("150 Accepted data connection to port {}", port));
        }
    }

    ctx.session.transfer.begin_running(ctx.now);
    info!("{:?} of {} started", kind, ctx.session.transfer.path);
}

fn retrieve_step(ctx: &mut Context<'_>) -> bool {
    if !data_connected(ctx) {
        abandon(ctx);
        return true;
    }

    if !ctx.session.transfer.has_pending() {
        let chunk = ctx.config.server.buffer_size;
        let transfer = &mut ctx.session.transfer;
        transfer.buffer.resize(chunk, 0);
        let read = match transfer.file.as_mut() {
            Some(file) => file.read(&mut transfer.buffer),
            None => Ok(0),
        };
        match read {
            Ok(0) => {
                close_transfer(ctx);
                return true;
            }
            Ok(n) => {
                transfer.filled = n;
                transfer.sent = 0;
            }
            Err(e) => {
                error!("Failed to read {}: {}", transfer.path, e);
                ctx.reply("451 Error reading file. Transfer aborted");
                abandon(ctx);
                return true;
            }
        }
    }

    flush_pending(ctx)
}

fn store_step(ctx: &mut Context<'_>) -> bool {
    let chunk = ctx.config.server.buffer_size;
    let transfer = &mut ctx.session.transfer;
    transfer.buffer.resize(chunk, 0);
    let n = match ctx.transport.read_data(&mut transfer.buffer) {
        Ok(n) => n,
        Err(e) => {
            warn!("Data read failed: {}", e);
            ctx.reply(e.to_ftp_response());
            abandon(ctx);
            return true;
        }
    };

    if n == 0 {
        // The client closing the data socket ends the upload
        if ctx.transport.data_connected() {
            return false;
        }
        close_transfer(ctx);
        return true;
    }

    let transfer = &mut ctx.session.transfer;
    let written = match transfer.file.as_mut() {
        Some(file) => file.write_all(&transfer.buffer[..n]),
        None => Ok(()),
    };
    match written {
        Ok(()) => {
            transfer.bytes += n as u64;
            true
        }
        Err(e) => {
            error!("Failed to write {}: {}", transfer.path, e);
            ctx.reply("552 Probably insufficient storage space");
            abandon(ctx);
            true
        }
    }
}

fn list_step(ctx: &mut Context<'_>, format: ListFormat) -> bool {
    if !data_connected(ctx) {
        abandon(ctx);
        return true;
    }
    if ctx.session.transfer.has_pending() {
        return flush_pending(ctx);
    }

    let next = ctx.session.transfer.cursor.as_mut().and_then(|c| c.next());
    match next {
        Some(entry) => {
            let line = format_entry(format, &entry);
            let transfer = &mut ctx.session.transfer;
            transfer.load(line.as_bytes());
            transfer.matches += 1;
            flush_pending(ctx);
        }
        None => {
            let matches = ctx.session.transfer.matches;
            debug!("Listing of {} done, {} entries", ctx.session.transfer.path, matches);
            ctx.session.transfer.finish();
            ctx.transport.close_data();
            if format == ListFormat::Mlsd {
                ctx.reply("226-options: -a -l");
            }
            ctx.reply(format!("226 {} matches total", matches));
        }
    }
    true
}

fn flush_pending(ctx: &mut Context<'_>) -> bool {
    let transfer = &mut ctx.session.transfer;
    match ctx
        .transport
        .write_data(&transfer.buffer[transfer.sent..transfer.filled])
    {
        Ok(n) => {
            transfer.sent += n;
            transfer.bytes += n as u64;
            n > 0
        }
        Err(e) => {
            warn!("Data write failed: {}", e);
            ctx.reply(e.to_ftp_response());
            abandon(ctx);
            true
        }
    }
}

/// Ends a file transfer normally and reports its throughput.
fn close_transfer(ctx: &mut Context<'_>) {
    let transfer = &mut ctx.session.transfer;
    if let Some(file) = transfer.file.as_mut() {
        if let Err(e) = file.flush() {
            warn!("Failed to flush {}: {}", transfer.path, e);
        }
    }
    let elapsed = transfer
        .started
        .map_or(0, |started| ctx.now.saturating_duration_since(started).as_millis() as u64);
    let bytes = transfer.bytes;
    info!(
        "Transfer of {} complete: {} bytes in {} ms",
        transfer.path, bytes, elapsed
    );
    transfer.finish();
    ctx.transport.close_data();

    if elapsed > 0 && bytes > 0 {
        ctx.reply("226-File successfully transferred");
        ctx.reply(format!("226 {} ms, {} kbytes/s", elapsed, bytes / elapsed));
    } else {
        ctx.reply("226 File successfully transferred");
    }
}
