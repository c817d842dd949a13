//! Scripted interaction commands for replays.
//!
//! One command per line: `<after> <verb> [args...]`, where `after` is the number of capture
//! packets applied before the command runs. Blank lines and `#` comments are skipped.
//!
//! ```text
//! 3 attack 5
//! 3 attack 5 noswing
//! 4 use 7 0.5 1.0 0.5
//! 6 mount 40
//! 8 steer 0.0 1.0
//! 9 dismount
//! 9 swing off
//! ```

use std::str::FromStr;

use mc_bot_entities::{EntityId, EntityTracker, InteractionError};
use mc_bot_proto::packets::{Hand, InteractPoint};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: missing {what}")]
    Missing { line: usize, what: &'static str },
    #[error("line {line}: invalid {what} `{value}`")]
    Invalid {
        line: usize,
        what: &'static str,
        value: String,
    },
    #[error("line {line}: unknown command `{verb}`")]
    UnknownCommand { line: usize, verb: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Swing(Hand),
    Attack { target: EntityId, swing: bool },
    Use {
        target: EntityId,
        point: Option<InteractPoint>,
    },
    Mount(EntityId),
    Dismount,
    Steer { left: f32, forward: f32 },
}

impl Command {
    pub fn apply(&self, tracker: &mut EntityTracker) -> Result<(), InteractionError> {
        match *self {
            Command::Swing(hand) => tracker.swing(hand),
            Command::Attack { target, swing } => tracker.attack(target, swing),
            Command::Use { target, point } => tracker.use_on(target, point),
            Command::Mount(target) => tracker.mount(target),
            Command::Dismount => return tracker.dismount(),
            Command::Steer { left, forward } => tracker.move_vehicle(left, forward),
        }
        Ok(())
    }
}

/// A command scheduled after a number of capture packets.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCommand {
    pub after: usize,
    pub command: Command,
}

/// Commands ordered by schedule; commands sharing a slot keep file order.
#[derive(Debug, Default)]
pub struct Script {
    commands: Vec<ScheduledCommand>,
}

impl Script {
    /// Remove and return every command due once `applied` packets have been handled.
    pub fn take_due(&mut self, applied: usize) -> Vec<Command> {
        let due = self.commands.iter().take_while(|c| c.after <= applied).count();
        self.commands.drain(..due).map(|c| c.command).collect()
    }

    /// Everything not yet run, in order.
    pub fn take_rest(&mut self) -> Vec<Command> {
        self.commands.drain(..).map(|c| c.command).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut commands = Vec::new();
        for (index, raw) in s.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }
            commands.push(parse_line(line, text)?);
        }
        // stable: same-slot commands stay in file order
        commands.sort_by_key(|c| c.after);
        Ok(Self { commands })
    }
}

fn parse_line(line: usize, text: &str) -> Result<ScheduledCommand, ScriptError> {
    let mut words = text.split_whitespace();
    let after = parse(line, "packet count", words.next())?;
    let verb = words.next().ok_or(ScriptError::Missing {
        line,
        what: "command",
    })?;
    let command = match verb {
        "swing" => Command::Swing(match words.next() {
            None | Some("main") => Hand::Main,
            Some("off") => Hand::Off,
            Some(other) => {
                return Err(ScriptError::Invalid {
                    line,
                    what: "hand",
                    value: other.to_string(),
                })
            }
        }),
        "attack" => Command::Attack {
            target: parse(line, "target", words.next())?,
            swing: words.next() != Some("noswing"),
        },
        "use" => {
            let target = parse(line, "target", words.next())?;
            let point = match words.next() {
                None => None,
                Some(x) => Some(InteractPoint::new(
                    parse(line, "x", Some(x))?,
                    parse(line, "y", words.next())?,
                    parse(line, "z", words.next())?,
                )),
            };
            Command::Use { target, point }
        }
        "mount" => Command::Mount(parse(line, "target", words.next())?),
        "dismount" => Command::Dismount,
        "steer" => Command::Steer {
            left: parse(line, "sideways", words.next())?,
            forward: parse(line, "forward", words.next())?,
        },
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                verb: other.to_string(),
            })
        }
    };
    Ok(ScheduledCommand { after, command })
}

fn parse<T: FromStr>(line: usize, what: &'static str, word: Option<&str>) -> Result<T, ScriptError> {
    let word = word.ok_or(ScriptError::Missing { line, what })?;
    word.parse().map_err(|_| ScriptError::Invalid {
        line,
        what,
        value: word.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script() {
        let mut script: Script = "
            # warm up
            3 attack 5
            1 swing off
            3 use 7 0 0 0   # zero is a real point
            3 attack 6 noswing
            9 steer -0.5 1
            9 dismount
        "
        .parse()
        .unwrap();
        assert_eq!(script.len(), 6);

        assert!(script.take_due(0).is_empty());
        assert_eq!(script.take_due(1), vec![Command::Swing(Hand::Off)]);
        assert_eq!(
            script.take_due(4),
            vec![
                Command::Attack {
                    target: 5,
                    swing: true
                },
                Command::Use {
                    target: 7,
                    point: Some(InteractPoint::new(0.0, 0.0, 0.0)),
                },
                Command::Attack {
                    target: 6,
                    swing: false
                },
            ]
        );
        assert_eq!(
            script.take_rest(),
            vec![
                Command::Steer {
                    left: -0.5,
                    forward: 1.0
                },
                Command::Dismount
            ]
        );
        assert!(script.is_empty());
    }

    #[test]
    fn plain_use_has_no_point() {
        let mut script: Script = "0 use 3\n0 mount 40".parse().unwrap();
        assert_eq!(
            script.take_due(0),
            vec![
                Command::Use {
                    target: 3,
                    point: None
                },
                Command::Mount(40)
            ]
        );
    }

    #[test]
    fn errors_name_the_line() {
        assert_eq!(
            "0 swing\n2 jump".parse::<Script>().unwrap_err(),
            ScriptError::UnknownCommand {
                line: 2,
                verb: "jump".into()
            }
        );
        assert_eq!(
            "x attack 1".parse::<Script>().unwrap_err(),
            ScriptError::Invalid {
                line: 1,
                what: "packet count",
                value: "x".into()
            }
        );
        assert_eq!(
            "0 use 3 1.0 2.0".parse::<Script>().unwrap_err(),
            ScriptError::Missing { line: 1, what: "z" }
        );
        assert_eq!(
            "0 swing left".parse::<Script>().unwrap_err(),
            ScriptError::Invalid {
                line: 1,
                what: "hand",
                value: "left".into()
            }
        );
    }
}
