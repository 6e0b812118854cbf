//! services/portal/src/cli/command.rs
//!
//! Defines the line protocol between the person at the console and the
//! portal shell. Every line typed at the prompt parses into one `Command`.

use clinic_portal_core::domain::AccountKind;

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  login <username> <password>
  logout
  register <patient|doctor> <username> <email> <password> [doctor_id]
  show <login|register>
  doctors                       list doctors open for registration
  whoami
Patient dashboard:
  records                       reload your health records
  record <id>                   show one record with its notes
  new                           add a health record
  edit <id>                     edit a health record
  delete <id>                   delete a health record
Doctor dashboard:
  patients                      reload your patient list
  open <patient_id>             show a patient's records
  back                          return to the patient list
  notes <record_id>             show the notes on a record
  note <record_id> <text...>    add a note to a record
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        username: String,
        password: String,
    },
    Logout,
    Register {
        kind: AccountKind,
        username: String,
        email: String,
        password: String,
        doctor_id: Option<i64>,
    },
    ShowLogin,
    ShowRegister,
    Doctors,
    WhoAmI,

    Records,
    Record(i64),
    New,
    Edit(i64),
    Delete(i64),

    Patients,
    Open(i64),
    Back,
    Notes(i64),
    Note {
        record_id: i64,
        text: String,
    },

    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid id")]
    BadId(String),
}

impl Command {
    /// Parses one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "login" => match args.as_slice() {
                [username, password] => Command::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(ParseError::Usage("login <username> <password>")),
            },
            "logout" => Command::Logout,
            "register" => parse_register(&args)?,
            "show" => match args.as_slice() {
                ["login"] => Command::ShowLogin,
                ["register"] => Command::ShowRegister,
                _ => return Err(ParseError::Usage("show <login|register>")),
            },
            "doctors" => Command::Doctors,
            "whoami" => Command::WhoAmI,

            "records" => Command::Records,
            "record" => Command::Record(single_id(&args, "record <id>")?),
            "new" => Command::New,
            "edit" => Command::Edit(single_id(&args, "edit <id>")?),
            "delete" => Command::Delete(single_id(&args, "delete <id>")?),

            "patients" => Command::Patients,
            "open" => Command::Open(single_id(&args, "open <patient_id>")?),
            "back" => Command::Back,
            "notes" => Command::Notes(single_id(&args, "notes <record_id>")?),
            "note" => match args.split_first() {
                Some((id, rest)) if !rest.is_empty() => Command::Note {
                    record_id: parse_id(id)?,
                    text: rest.join(" "),
                },
                _ => return Err(ParseError::Usage("note <record_id> <text...>")),
            },

            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_register(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "register <patient|doctor> <username> <email> <password> [doctor_id]";
    let (kind, username, email, password, doctor) = match args {
        [kind, username, email, password] => (kind, username, email, password, None),
        [kind, username, email, password, doctor] => {
            (kind, username, email, password, Some(doctor))
        }
        _ => return Err(ParseError::Usage(USAGE)),
    };
    let kind = kind
        .parse::<AccountKind>()
        .map_err(|_| ParseError::Usage(USAGE))?;
    let doctor_id = doctor.map(|d| parse_id(d)).transpose()?;

    Ok(Command::Register {
        kind,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        doctor_id,
    })
}

fn single_id(args: &[&str], usage: &'static str) -> Result<i64, ParseError> {
    match args {
        [id] => parse_id(id),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn parse_id(raw: &str) -> Result<i64, ParseError> {
    raw.parse::<i64>()
        .map_err(|_| ParseError::BadId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn login_takes_two_words() {
        assert_eq!(
            Command::parse("login alice pw1"),
            Ok(Some(Command::Login {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            }))
        );
        assert!(matches!(
            Command::parse("login alice"),
            Err(ParseError::Usage(_))
        ));
    }

    #[test]
    fn patient_registration_carries_doctor() {
        let parsed = Command::parse("register patient carol c@x.org pw 7").unwrap();
        assert_eq!(
            parsed,
            Some(Command::Register {
                kind: AccountKind::Patient,
                username: "carol".to_string(),
                email: "c@x.org".to_string(),
                password: "pw".to_string(),
                doctor_id: Some(7),
            })
        );
    }

    #[test]
    fn registration_kind_must_be_known() {
        assert!(matches!(
            Command::parse("register nurse dan d@x.org pw"),
            Err(ParseError::Usage(_))
        ));
    }

    #[test]
    fn note_keeps_full_text() {
        assert_eq!(
            Command::parse("note 12 Follow up  in two weeks"),
            Ok(Some(Command::Note {
                record_id: 12,
                text: "Follow up in two weeks".to_string(),
            }))
        );
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(
            Command::parse("delete abc"),
            Err(ParseError::BadId("abc".to_string()))
        );
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(
            Command::parse("dance"),
            Err(ParseError::Unknown("dance".to_string()))
        );
    }
}
