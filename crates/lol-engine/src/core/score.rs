//! Per-level counters and the win/lose decision.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// How a level is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictoryCondition {
    /// This many hero arrivals at destinations.
    Destination(u32),
    /// Every goodie slot at least this high.
    GoodieCount([i32; 4]),
    /// This many defeated enemies; `None` means all that were created.
    EnemyCount(Option<u32>),
    /// Only a win countdown wins.
    Survive,
}

impl Default for VictoryCondition {
    fn default() -> Self {
        VictoryCondition::Destination(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Score {
    pub heroes_created: u32,
    pub heroes_defeated: u32,
    pub goodies_collected: [i32; 4],
    pub destination_arrivals: u32,
    pub enemies_created: u32,
    pub enemies_defeated: u32,
    pub victory: VictoryCondition,
    outcome: Option<Outcome>,
}

impl Score {
    pub fn new(victory: VictoryCondition) -> Self {
        Self {
            victory,
            ..Default::default()
        }
    }

    /// Zero every counter and forget the outcome; the victory condition stays.
    pub fn reset(&mut self) {
        *self = Self::new(self.victory);
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record a win unless the level already ended.
    pub fn win(&mut self) {
        if self.outcome.is_none() {
            log::info!("level won");
            self.outcome = Some(Outcome::Won);
        }
    }

    /// Record a loss unless the level already ended.
    pub fn lose(&mut self) {
        if self.outcome.is_none() {
            log::info!("level lost");
            self.outcome = Some(Outcome::Lost);
        }
    }

    pub fn on_hero_created(&mut self) {
        self.heroes_created += 1;
    }

    pub fn on_hero_defeated(&mut self) {
        self.heroes_defeated += 1;
        if self.heroes_defeated >= self.heroes_created {
            self.lose();
        }
    }

    pub fn on_enemy_created(&mut self) {
        self.enemies_created += 1;
    }

    pub fn on_enemy_defeated(&mut self) {
        self.enemies_defeated += 1;
        if let VictoryCondition::EnemyCount(target) = self.victory {
            let needed = target.unwrap_or(self.enemies_created);
            if self.enemies_defeated >= needed {
                self.win();
            }
        }
    }

    pub fn on_goodie_collected(&mut self, score: &[i32; 4]) {
        for (total, delta) in self.goodies_collected.iter_mut().zip(score) {
            *total += delta;
        }
        if let VictoryCondition::GoodieCount(target) = self.victory {
            if self.goodies_collected.iter().zip(&target).all(|(have, need)| have >= need) {
                self.win();
            }
        }
    }

    pub fn on_arrival(&mut self) {
        self.destination_arrivals += 1;
        if let VictoryCondition::Destination(target) = self.victory {
            if self.destination_arrivals >= target {
                self.win();
            }
        }
    }
}
