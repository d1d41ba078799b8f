//! Achievement categories answered from local data rather than the live graph.

use super::{Entity, EntityType, MAX_POPULARITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Achievement {
    WorldCup,
    ChampionsLeague,
    BallonDor,
}

impl Achievement {
    pub const ALL: [Achievement; 3] = [
        Achievement::WorldCup,
        Achievement::ChampionsLeague,
        Achievement::BallonDor,
    ];

    /// Reserved sentinel identifier
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::WorldCup => "WORLD_CUP",
            Achievement::ChampionsLeague => "CHAMPIONS_LEAGUE",
            Achievement::BallonDor => "BALLON_DOR",
        }
    }

    /// Board label
    pub fn label(&self) -> &'static str {
        match self {
            Achievement::WorldCup => "World Cup Winner",
            Achievement::ChampionsLeague => "Champions League Winner",
            Achievement::BallonDor => "Ballon d'Or Winner",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Achievement::WorldCup => &["world cup winner", "world cup", "fifa world cup winner"],
            Achievement::ChampionsLeague => &[
                "champions league winner",
                "champions league",
                "ucl winner",
                "ucl",
            ],
            Achievement::BallonDor => &[
                "ballon d'or winner",
                "ballon d'or",
                "ballon d’or winner",
                "ballon d’or",
                "ballon dor",
            ],
        }
    }

    pub fn from_id(id: &str) -> Option<Achievement> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn from_label(label: &str) -> Option<Achievement> {
        let normalized = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.aliases().iter().any(|alias| *alias == normalized))
    }

    pub fn entity(&self) -> Entity {
        Entity::new(
            self.id(),
            self.label(),
            EntityType::Achievement,
            MAX_POPULARITY,
        )
    }
}
