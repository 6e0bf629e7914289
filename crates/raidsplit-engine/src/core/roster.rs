use std::{collections::HashMap, fs::File, io, path::Path};

use super::{
    Character, CharacterId, PlayerId, TokenSlotSet, UnknownClassError, UnknownRoleError,
    UnknownTokenSlotError,
};

/// Maximum number of characters a roster can hold.
pub const MAX_CHARACTERS: usize = 100;

/// Errors raised while loading a roster. All of them are fatal configuration errors.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RosterError {
    #[display("failed to read roster: {_0}")]
    #[from]
    Io(io::Error),
    #[display("malformed roster record: {_0}")]
    #[from]
    Csv(csv::Error),
    #[display("record {record}: missing {field} field")]
    MissingField { record: usize, field: &'static str },
    #[display("record {record}: {source}")]
    UnknownClass {
        record: usize,
        source: UnknownClassError,
    },
    #[display("record {record}: {source}")]
    UnknownRole {
        record: usize,
        source: UnknownRoleError,
    },
    #[display("record {record}: {source}")]
    UnknownTokenSlot {
        record: usize,
        source: UnknownTokenSlotError,
    },
    #[display("number of records ({count}) exceeds capacity ({})", MAX_CHARACTERS)]
    TooManyCharacters { count: usize },
}

/// One raw roster row.
///
/// Column order in the CSV input: `player, role, character, class, main, [token slots]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub player: String,
    pub role: String,
    pub name: String,
    pub class: String,
    pub main: bool,
    pub token_slots: String,
}

impl RosterRecord {
    /// Convenience constructor for records without token slot information.
    #[must_use]
    pub fn new(player: &str, role: &str, name: &str, class: &str, main: bool) -> Self {
        Self {
            player: player.to_owned(),
            role: role.to_owned(),
            name: name.to_owned(),
            class: class.to_owned(),
            main,
            token_slots: String::new(),
        }
    }

    fn from_csv(index: usize, record: &csv::StringRecord) -> Result<Self, RosterError> {
        let field = |i: usize, name: &'static str| {
            record.get(i).ok_or(RosterError::MissingField {
                record: index,
                field: name,
            })
        };
        Ok(Self {
            player: field(0, "player")?.to_owned(),
            role: field(1, "role")?.to_owned(),
            name: field(2, "character")?.to_owned(),
            class: field(3, "class")?.to_owned(),
            main: field(4, "main")?.eq_ignore_ascii_case("true"),
            token_slots: record.get(5).unwrap_or_default().to_owned(),
        })
    }
}

/// The full, immutable list of characters and the players owning them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    characters: Vec<Character>,
    players: Vec<String>,
}

impl Roster {
    /// Loads a roster from a headerless CSV file.
    pub fn from_path<P>(path: P) -> Result<Self, RosterError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Loads a roster from headerless CSV data.
    pub fn from_reader<R>(reader: R) -> Result<Self, RosterError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = vec![];
        for (index, record) in reader.records().enumerate() {
            records.push(RosterRecord::from_csv(index, &record?)?);
        }
        Self::from_records(records)
    }

    /// Builds a roster from raw records, deduplicating players in order of first appearance.
    pub fn from_records<I>(records: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = RosterRecord>,
    {
        let records = records.into_iter().collect::<Vec<_>>();
        if records.len() > MAX_CHARACTERS {
            return Err(RosterError::TooManyCharacters {
                count: records.len(),
            });
        }

        let mut players = vec![];
        let mut player_index = HashMap::new();
        let mut characters = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let player = *player_index
                .entry(record.player.clone())
                .or_insert_with(|| {
                    players.push(record.player.clone());
                    players.len() - 1
                });
            let class = record
                .class
                .parse()
                .map_err(|source| RosterError::UnknownClass {
                    record: index,
                    source,
                })?;
            let role = record
                .role
                .parse()
                .map_err(|source| RosterError::UnknownRole {
                    record: index,
                    source,
                })?;
            let token_slots = record.token_slots.parse::<TokenSlotSet>().map_err(|source| {
                RosterError::UnknownTokenSlot {
                    record: index,
                    source,
                }
            })?;
            characters.push(Character {
                player,
                name: record.name,
                class,
                role,
                main: record.main,
                token_slots,
            });
        }

        Ok(Self {
            characters,
            players,
        })
    }

    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    #[must_use]
    pub fn character(&self, cid: CharacterId) -> &Character {
        &self.characters[cid]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    #[must_use]
    pub fn players(&self) -> &[String] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> &str {
        &self.players[player]
    }

    /// Length of the longest character name, in characters. Used to align printed tables.
    #[must_use]
    pub fn longest_name(&self) -> usize {
        self.characters
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Class, Role, TokenSlot};

    use super::*;

    #[test]
    fn test_load_csv() {
        let csv = "\
alice, tank, Alitank, warrior, True
alice, healer, Aliheal, priest, False, head/legs
bob, Ranged, Bobshot, hunter, true,
";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.players(), ["alice", "bob"]);

        let tank = roster.character(0);
        assert_eq!(tank.player, 0);
        assert_eq!(tank.name, "Alitank");
        assert_eq!(tank.class, Class::Warrior);
        assert_eq!(tank.role, Role::Tank);
        assert!(tank.main);

        let healer = roster.character(1);
        assert_eq!(healer.player, 0);
        assert!(!healer.main);
        assert!(healer.token_slots.contains(TokenSlot::Head));
        assert!(healer.token_slots.contains(TokenSlot::Legs));

        let hunter = roster.character(2);
        assert_eq!(hunter.player, 1);
        assert_eq!(hunter.role, Role::Ranged);
        assert!(hunter.main);
        assert!(hunter.token_slots.is_empty());
    }

    #[test]
    fn test_unknown_class_is_an_error() {
        let csv = "alice,tank,Alitank,warrior,True\nbob,tank,Bobtank,knight,True\n";
        let err = Roster::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::UnknownClass { record: 1, .. }));
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let csv = "alice,support,Alitank,warrior,True\n";
        let err = Roster::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::UnknownRole { record: 0, .. }));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let csv = "alice,tank,Alitank\n";
        let err = Roster::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RosterError::MissingField {
                record: 0,
                field: "class"
            }
        ));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let records = (0..=MAX_CHARACTERS)
            .map(|i| RosterRecord::new(&format!("p{i}"), "melee", &format!("c{i}"), "rogue", true));
        let err = Roster::from_records(records).unwrap_err();
        assert!(matches!(
            err,
            RosterError::TooManyCharacters { count } if count == MAX_CHARACTERS + 1
        ));
    }
}
