// Session-level scenarios against an in-memory transport and a temporary root
use crate::config::{Config, ServerConfig};
use crate::core_network::mock::MockTransport;
use crate::core_storage::LocalStorage;
use crate::server::FtpServer;
use crate::session::SessionStage;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const STEP: Duration = Duration::from_millis(10);

struct Harness {
    server: FtpServer,
    transport: MockTransport,
    now: Instant,
    root: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(|_| {})
    }

    fn with_config(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.root_dir = root.path().to_path_buf();
        tweak(&mut config.server);

        let storage = LocalStorage::new(root.path()).unwrap();
        let transport = MockTransport::new();
        let mut server = FtpServer::new(
            Arc::new(config),
            Box::new(storage),
            Box::new(transport.clone()),
        );
        server.init().unwrap();

        Self {
            server,
            transport,
            now: Instant::now(),
            root,
        }
    }

    fn root(&self) -> &Path {
        self.root.path()
    }

    fn run(&mut self, polls: usize) {
        for _ in 0..polls {
            self.now += STEP;
            self.server.service_at(self.now);
        }
    }

    fn connect(&mut self) -> String {
        self.transport.connect_client();
        self.run(5);
        self.transport.take_output()
    }

    /// Sends one line and polls long enough for it to be read and answered.
    fn command(&mut self, line: &str) -> String {
        self.transport.send(&format!("{}\r\n", line));
        self.run(line.len() + 40);
        self.transport.take_output()
    }

    fn login(&mut self) {
        self.connect();
        self.command("USER arduino");
        self.command("PASS test");
        assert_eq!(self.server.stage(), SessionStage::Cmd);
    }

    fn passive(&mut self) {
        let reply = self.command("PASV");
        assert!(reply.starts_with("227 "), "{}", reply);
    }
}

fn content(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 251) as u8).collect()
}

#[test]
fn test_greeting_and_login() {
    let mut h = Harness::new();
    let greeting = h.connect();
    assert_eq!(greeting.lines().count(), 3);
    assert!(greeting.lines().all(|l| l.starts_with("220")));
    assert!(greeting.contains("220 --   Version tickftpd-"));
    assert_eq!(h.server.stage(), SessionStage::User);

    h.transport.send("USER arduino\r\nPASS test\r\nPWD\r\n");
    h.run(200);
    let replies = h.transport.take_output();
    let lines: Vec<&str> = replies.lines().collect();
    assert_eq!(lines.len(), 3, "{}", replies);
    assert!(lines[0].starts_with("331 "));
    assert!(lines[1].starts_with("230 "));
    assert_eq!(lines[2], "257 \"/\" is your current directory");
}

#[test]
fn test_wrong_user_disconnects() {
    let mut h = Harness::new();
    h.connect();
    let reply = h.command("USER root");
    assert!(reply.starts_with("530 "), "{}", reply);
    assert!(!h.transport.state().control_open);
    assert_eq!(h.server.stage(), SessionStage::Client);
}

#[test]
fn test_wrong_password_disconnects() {
    let mut h = Harness::new();
    h.connect();
    h.command("USER arduino");
    let reply = h.command("PASS nope");
    assert!(reply.starts_with("530 "), "{}", reply);
    assert!(!h.transport.state().control_open);
}

#[test]
fn test_commands_before_login() {
    let mut h = Harness::new();
    h.connect();
    let reply = h.command("FEAT");
    assert!(reply.starts_with("211-Extensions supported:\r\n"));
    assert!(reply.contains(" MLST type*;modify*;size*;\r\n"));
    assert!(reply.ends_with("211 End.\r\n"));
    assert_eq!(h.server.stage(), SessionStage::User);

    assert!(h.command("AUTH TLS").starts_with("502 "));

    let reply = h.command("PWD");
    assert!(reply.starts_with("530 "), "{}", reply);
    assert!(!h.transport.state().control_open);
}

#[test]
fn test_pass_out_of_sequence() {
    let mut h = Harness::new();
    h.connect();
    let reply = h.command("PASS test");
    assert!(reply.starts_with("503 "), "{}", reply);
    assert!(!h.transport.state().control_open);
}

#[test]
fn test_user_restarts_login() {
    let mut h = Harness::new();
    h.login();
    h.command("MKD d");
    h.command("CWD d");
    assert!(h.command("USER arduino").starts_with("331 "));
    assert_eq!(h.server.stage(), SessionStage::Pass);
    h.command("PASS test");
    assert_eq!(h.command("PWD"), "257 \"/\" is your current directory\r\n");
}

#[test]
fn test_quit() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("QUIT"), "221 Goodbye\r\n");
    assert!(!h.transport.state().control_open);
    assert_eq!(h.server.stage(), SessionStage::Client);
}

#[test]
fn test_client_disconnect_resets_session() {
    let mut h = Harness::new();
    h.login();
    h.command("MKD d");
    h.command("CWD d");
    h.transport.disconnect_client();
    h.run(5);
    assert_eq!(h.server.stage(), SessionStage::Client);

    h.login();
    assert_eq!(h.command("PWD"), "257 \"/\" is your current directory\r\n");
}

#[test]
fn test_idle_timeout() {
    let mut h = Harness::with_config(|server| server.idle_timeout_secs = 1);
    h.login();
    assert!(h.command("NOOP").starts_with("200 "));
    h.run(150);
    assert_eq!(h.transport.take_output(), "530 Timeout\r\n");
    assert!(!h.transport.state().control_open);
    assert_eq!(h.server.stage(), SessionStage::Client);
}

#[test]
fn test_auth_timeout() {
    let mut h = Harness::with_config(|server| server.auth_timeout_secs = 1);
    h.connect();
    h.run(150);
    assert_eq!(h.transport.take_output(), "530 Timeout\r\n");
    assert!(!h.transport.state().control_open);
}

#[test]
fn test_syntax_errors_keep_session() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("STORE x"), "500 Syntax error\r\n");
    assert_eq!(h.command("XYZ"), "500 Unknown command\r\n");
    let long = format!("MKD {}", "a".repeat(400));
    assert_eq!(h.command(&long), "500 Syntax error\r\n");
    assert_eq!(h.command("NOOP"), "200 Zzz...\r\n");
    assert_eq!(h.server.stage(), SessionStage::Cmd);
}

#[test]
fn test_mkd_cwd_pwd() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("MKD /a"), "257 \"/a\" created\r\n");
    assert_eq!(h.command("CWD /a"), "250 Directory changed to /a\r\n");
    assert_eq!(h.command("PWD"), "257 \"/a\" is your current directory\r\n");
    assert_eq!(h.command("CWD ."), "257 \"/a\" is your current directory\r\n");
    assert_eq!(h.command("MKD /a"), "521 \"/a\" directory already exists\r\n");
    assert!(h.root().join("a").is_dir());
}

#[test]
fn test_cwd_errors() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("CWD /missing"), "550 /missing not found.\r\n");
    assert_eq!(h.command("CWD a*b"), "553 File name not allowed\r\n");
    assert_eq!(h.command("CWD"), "501 No file name\r\n");
    fs::write(h.root().join("f.txt"), b"x").unwrap();
    assert_eq!(h.command("CWD f.txt"), "550 \"/f.txt\" is not directory\r\n");
}

#[test]
fn test_cdup() {
    let mut h = Harness::new();
    h.login();
    fs::create_dir_all(h.root().join("a/b")).unwrap();
    h.command("CWD a/b");
    assert_eq!(h.command("CDUP"), "250 Ok. Current directory is /a\r\n");
    assert_eq!(h.command("CWD .."), "250 Ok. Current directory is /\r\n");
    assert_eq!(h.command("CDUP"), "250 Ok. Current directory is /\r\n");

    h.command("CWD /a/b");
    fs::remove_dir_all(h.root().join("a")).unwrap();
    assert_eq!(h.command("CDUP"), "250 Ok. Current directory is /\r\n");
}

#[test]
fn test_dele_and_rmd() {
    let mut h = Harness::new();
    h.login();
    fs::create_dir(h.root().join("d")).unwrap();
    fs::write(h.root().join("d/f"), b"x").unwrap();

    assert_eq!(
        h.command("RMD d"),
        "550 Can't remove \"d\". Directory not empty?\r\n"
    );
    assert_eq!(h.command("DELE d/f"), "250 Deleted d/f\r\n");
    assert_eq!(h.command("DELE d/f"), "550 /d/f not found.\r\n");
    assert_eq!(h.command("RMD d"), "250 \"d\" deleted\r\n");
    assert!(!h.root().join("d").exists());
    assert_eq!(h.command("RMD"), "501 No file name\r\n");
}

#[test]
fn test_rename() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("one"), b"1").unwrap();
    fs::write(h.root().join("two"), b"2").unwrap();
    fs::create_dir(h.root().join("dir")).unwrap();

    assert_eq!(h.command("RNTO x"), "503 Need RNFR before RNTO\r\n");
    assert_eq!(h.command("RNFR nothing"), "550 /nothing not found.\r\n");

    assert!(h.command("RNFR one").starts_with("350 "));
    assert!(h.command("RNFR two").starts_with("350 "));
    assert_eq!(
        h.command("RNTO dir/moved"),
        "250 File successfully renamed or moved\r\n"
    );
    assert_eq!(fs::read(h.root().join("dir/moved")).unwrap(), b"2");
    assert!(h.root().join("one").exists());

    assert_eq!(h.command("RNTO again"), "503 Need RNFR before RNTO\r\n");

    h.command("RNFR one");
    assert_eq!(h.command("RNTO dir/moved"), "553 dir/moved already exists\r\n");
    assert_eq!(h.command("RNTO whatever"), "503 Need RNFR before RNTO\r\n");

    // One final reply per command, so the NOOP answer stays in step
    h.command("RNFR one");
    h.transport.send("RNTO nodir/x\r\nNOOP\r\n");
    h.run(80);
    assert_eq!(
        h.transport.take_output(),
        "451 Rename/move failure\r\n200 Zzz...\r\n"
    );
    assert!(h.root().join("one").exists());
}

#[test]
fn test_transfer_parameters() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("MODE S"), "200 S Ok\r\n");
    assert!(h.command("MODE B").starts_with("504 "));
    assert_eq!(h.command("STRU F"), "200 F Ok\r\n");
    assert!(h.command("STRU R").starts_with("504 "));
    assert_eq!(h.command("TYPE A"), "200 TYPE is now ASCII\r\n");
    assert_eq!(h.command("TYPE I"), "200 TYPE is now 8-bit binary\r\n");
    assert!(h.command("TYPE E").starts_with("504 "));
}

#[test]
fn test_pasv_reply() {
    let mut h = Harness::with_config(|server| {
        server.pasv_address = String::from("192.168.1.10");
        server.pasv_port = 50100;
    });
    h.login();
    assert_eq!(
        h.command("PASV"),
        "227 Entering Passive Mode (192,168,1,10,195,180)\r\n"
    );
    assert_eq!(h.transport.state().data_listen_port, Some(50100));
}

#[test]
fn test_port_reply() {
    let mut h = Harness::new();
    h.login();
    assert_eq!(h.command("PORT 127,0,0,1,19,137"), "200 PORT command successful\r\n");
    assert_eq!(h.command("PORT 1,2,3"), "501 Can't interpret parameters\r\n");
}

#[test]
fn test_stor_then_retr() {
    let mut h = Harness::new();
    h.login();
    let data = content(10_000);

    h.passive();
    h.transport.upload(&data);
    let reply = h.command("STOR up.bin");
    assert!(reply.starts_with("150 Accepted data connection to port 55600\r\n"), "{}", reply);
    assert!(reply.contains("226"), "{}", reply);
    assert_eq!(fs::read(h.root().join("up.bin")).unwrap(), data);

    h.passive();
    h.transport.connect_data_client();
    let reply = h.command("RETR up.bin");
    assert!(reply.starts_with("150-Connected to port 55600\r\n150 10000 bytes to download\r\n"));
    assert!(reply.contains("226"), "{}", reply);
    assert_eq!(h.transport.take_data_output(), data);
    assert!(!h.transport.state().data_open);
}

#[test]
fn test_stor_truncates_and_appe_appends() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("log.txt"), b"old content").unwrap();

    h.passive();
    h.transport.upload(b"new");
    h.command("STOR log.txt");
    assert_eq!(fs::read(h.root().join("log.txt")).unwrap(), b"new");

    h.passive();
    h.transport.upload(b"+more");
    h.command("APPE log.txt");
    assert_eq!(fs::read(h.root().join("log.txt")).unwrap(), b"new+more");
}

#[test]
fn test_active_retr() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("f.txt"), b"hello").unwrap();
    h.command("PORT 127,0,0,1,19,137");
    let reply = h.command("RETR f.txt");
    assert!(reply.starts_with("150-Connected to port 5001\r\n"), "{}", reply);
    assert_eq!(h.transport.take_data_output(), b"hello");
    assert_eq!(
        h.transport.state().connected_to,
        Some("127.0.0.1:5001".parse::<SocketAddr>().unwrap())
    );
}

#[test]
fn test_active_connect_in_flight_keeps_polling() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("f.txt"), b"hello").unwrap();
    h.command("PORT 127,0,0,1,19,137");
    h.transport.state().connect_stalled = true;

    assert_eq!(h.command("RETR f.txt"), "");
    assert!(h.transport.state().connect_attempts > 30);
    h.now += STEP;
    assert!(!h.server.service_at(h.now));

    // The control channel is still served during the handshake
    assert_eq!(h.command("NOOP"), "200 Zzz...\r\n");

    h.run(30);
    assert_eq!(h.transport.take_output(), "425 No data connection\r\n");
    assert_eq!(h.transport.state().connected_to, None);

    h.transport.state().connect_stalled = false;
    let reply = h.command("RETR f.txt");
    assert!(reply.starts_with("150-Connected to port 5001\r\n"), "{}", reply);
    assert_eq!(h.transport.take_data_output(), b"hello");
}

#[test]
fn test_active_connect_completes_late() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("f.txt"), b"hello").unwrap();
    h.command("PORT 127,0,0,1,19,137");
    h.transport.state().connect_stalled = true;
    assert_eq!(h.command("RETR f.txt"), "");

    h.transport.state().connect_stalled = false;
    h.run(5);
    let reply = h.transport.take_output();
    assert!(reply.starts_with("150-Connected to port 5001\r\n"), "{}", reply);
    assert!(reply.contains("226"), "{}", reply);
    assert_eq!(h.transport.take_data_output(), b"hello");
}

#[test]
fn test_data_connection_failures() {
    let mut h = Harness::new();
    h.login();
    fs::write(h.root().join("f.txt"), b"hello").unwrap();

    assert_eq!(h.command("RETR f.txt"), "425 No data connection\r\n");

    h.transport.state().refuse_connect = true;
    h.command("PORT 127,0,0,1,19,137");
    assert_eq!(h.command("RETR f.txt"), "425 No data connection\r\n");

    // passive client that never shows up
    h.passive();
    let reply = h.command("RETR f.txt");
    assert_eq!(reply, "");
    h.run(100);
    assert_eq!(h.transport.take_output(), "425 No data connection\r\n");

    assert_eq!(h.command("RETR missing"), "550 /missing not found.\r\n");
    assert_eq!(h.command("RETR"), "501 No file name\r\n");
}

#[test]
fn test_abort_mid_retr_then_retry() {
    let mut h = Harness::with_config(|server| server.buffer_size = 16);
    h.login();
    let data = content(10_000);
    fs::write(h.root().join("big.bin"), &data).unwrap();

    h.passive();
    h.transport.connect_data_client();
    h.command("RETR big.bin");
    assert_eq!(h.command("LIST"), "425 Transfer already in progress\r\n");

    let reply = h.command("ABOR");
    assert_eq!(reply, "426 Transfer aborted\r\n226 Data connection closed\r\n");
    let partial = h.transport.take_data_output();
    assert!(!partial.is_empty() && partial.len() < data.len());
    assert!(!h.transport.state().data_open);

    assert_eq!(h.command("ABOR"), "226 Data connection closed\r\n");

    h.passive();
    h.transport.connect_data_client();
    h.command("RETR big.bin");
    h.run(1000);
    assert!(h.transport.take_output().contains("226 "));
    assert_eq!(h.transport.take_data_output(), data);
}

#[test]
fn test_abort_mid_stor() {
    let mut h = Harness::with_config(|server| server.buffer_size = 16);
    h.login();
    h.passive();
    // A client that keeps the socket open after sending
    h.transport.connect_data_client();
    h.transport.state().data_in.extend(content(64));
    h.command("STOR part.bin");
    assert!(h.transport.state().data_open);

    let reply = h.command("ABOR");
    assert_eq!(reply, "426 Transfer aborted\r\n226 Data connection closed\r\n");
    assert_eq!(fs::read(h.root().join("part.bin")).unwrap(), content(64));

    h.passive();
    h.transport.upload(b"done");
    let reply = h.command("STOR part.bin");
    assert!(reply.contains("226"), "{}", reply);
    assert_eq!(fs::read(h.root().join("part.bin")).unwrap(), b"done");
}

#[test]
fn test_data_client_drop_during_retr() {
    let mut h = Harness::with_config(|server| server.buffer_size = 16);
    h.login();
    fs::write(h.root().join("big.bin"), content(10_000)).unwrap();
    h.passive();
    h.transport.connect_data_client();
    h.command("RETR big.bin");
    h.transport.drop_data_client();
    h.run(3);
    assert_eq!(
        h.transport.take_output(),
        "426 Data connection closed. Transfer aborted\r\n"
    );
    assert!(h.command("ABOR").starts_with("226 "));
}

#[test]
fn test_listings() {
    let mut h = Harness::new();
    h.login();
    fs::create_dir(h.root().join("docs")).unwrap();
    fs::write(h.root().join("a.txt"), b"12345").unwrap();

    h.passive();
    h.transport.connect_data_client();
    let reply = h.command("LIST -la");
    assert!(reply.starts_with("150 Accepted data connection"), "{}", reply);
    assert!(reply.ends_with("226 2 matches total\r\n"), "{}", reply);
    let listing = String::from_utf8(h.transport.take_data_output()).unwrap();
    assert!(listing.contains("+/,\tdocs\r\n"));
    assert!(listing.contains("+r,s5,\ta.txt\r\n"));

    h.passive();
    h.transport.connect_data_client();
    h.command("NLST /");
    let mut names: Vec<String> = String::from_utf8(h.transport.take_data_output())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.txt", "docs"]);

    h.passive();
    h.transport.connect_data_client();
    let reply = h.command("MLSD");
    assert!(reply.ends_with("226-options: -a -l\r\n226 2 matches total\r\n"));
    let listing = String::from_utf8(h.transport.take_data_output()).unwrap();
    assert!(listing.lines().any(|l| l.starts_with("Type=dir;Modify=") && l.ends_with("; docs")));
    assert!(listing.lines().any(|l| l.starts_with("Type=file;") && l.ends_with(";Size=5; a.txt")));

    assert_eq!(h.command("LIST a.txt"), "550 Can't open directory /a.txt\r\n");
    assert_eq!(h.command("LIST nope"), "550 /nope not found.\r\n");
}

#[test]
fn test_metadata_commands() {
    let mut h = Harness::new();
    h.login();
    fs::create_dir(h.root().join("d")).unwrap();
    fs::write(h.root().join("f.txt"), b"12345").unwrap();

    assert_eq!(h.command("SIZE f.txt"), "213 5\r\n");
    assert_eq!(h.command("SIZE d"), "450 Can't open d\r\n");
    assert_eq!(h.command("SIZE x"), "550 /x not found.\r\n");

    assert_eq!(h.command("MFMT 20200102030406 f.txt"), "213 20200102030406\r\n");
    assert_eq!(h.command("MDTM f.txt"), "213 20200102030406\r\n");
    assert_eq!(h.command("MDTM 20210304050608123 f.txt"), "213 20210304050608\r\n");
    assert_eq!(h.command("MDTM f.txt"), "213 20210304050608\r\n");
    assert!(h.command("MFMT f.txt").starts_with("501 "));
    assert!(h.command("MDTM 20211304050607 f.txt").starts_with("501 "));
    assert_eq!(h.command("MDTM"), "501 No file name\r\n");

    let reply = h.command("MLST f.txt");
    assert_eq!(
        reply,
        "250-Begin\r\n Type=file;Modify=20210304050608;Size=5; /f.txt\r\n250 End.\r\n"
    );
}

#[test]
fn test_site_commands() {
    let mut h = Harness::new();
    h.login();
    let reply = h.command("SITE FREE");
    assert!(
        reply.starts_with("200 ") && reply.contains(" MB free of ")
            || reply == "500 Unable to retrieve free space\r\n",
        "{}",
        reply
    );
    assert_eq!(h.command("SITE CHMOD 777 x"), "500 Unknown SITE command CHMOD 777 x\r\n");
}
