#[allow(clippy::upper_case_acronyms)]
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    // Access control
    USER,
    PASS,
    AUTH,
    CDUP,
    CWD,
    PWD,
    QUIT,
    // Transfer parameters
    MODE,
    PASV,
    PORT,
    STRU,
    TYPE,
    // Service commands
    ABOR,
    APPE,
    DELE,
    LIST,
    MLSD,
    MLST,
    MKD,
    NLST,
    NOOP,
    RETR,
    RMD,
    RNFR,
    RNTO,
    STOR,
    // Extensions
    FEAT,
    MDTM,
    MFMT,
    SITE,
    SIZE,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "AUTH" => Some(FtpCommand::AUTH),
            "CDUP" => Some(FtpCommand::CDUP),
            "CWD" => Some(FtpCommand::CWD),
            "PWD" => Some(FtpCommand::PWD),
            "QUIT" => Some(FtpCommand::QUIT),
            "MODE" => Some(FtpCommand::MODE),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "STRU" => Some(FtpCommand::STRU),
            "TYPE" => Some(FtpCommand::TYPE),
            "ABOR" => Some(FtpCommand::ABOR),
            "APPE" => Some(FtpCommand::APPE),
            "DELE" => Some(FtpCommand::DELE),
            "LIST" => Some(FtpCommand::LIST),
            "MLSD" => Some(FtpCommand::MLSD),
            "MLST" => Some(FtpCommand::MLST),
            "MKD" => Some(FtpCommand::MKD),
            "NLST" => Some(FtpCommand::NLST),
            "NOOP" => Some(FtpCommand::NOOP),
            "RETR" => Some(FtpCommand::RETR),
            "RMD" => Some(FtpCommand::RMD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "STOR" => Some(FtpCommand::STOR),
            "FEAT" => Some(FtpCommand::FEAT),
            "MDTM" => Some(FtpCommand::MDTM),
            "MFMT" => Some(FtpCommand::MFMT),
            "SITE" => Some(FtpCommand::SITE),
            "SIZE" => Some(FtpCommand::SIZE),
            _ => None,
        }
    }

    /// Commands answered before the client has logged in.
    pub fn allowed_before_login(self) -> bool {
        matches!(
            self,
            FtpCommand::USER | FtpCommand::PASS | FtpCommand::FEAT | FtpCommand::AUTH
        )
    }
}
