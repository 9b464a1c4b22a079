//! Screen flow and save points
//!
//! `Game` routes between the menus and the level session, keeps the
//! profile in step with what happens in play and writes progress at each
//! save point. Storage failures are logged and never interrupt play.

use glam::Vec2;

use crate::consts::{COIN_SCORE, LEVEL_SELECT_SLOTS};
use crate::persistence::ProgressGateway;
use crate::progress::{Profile, ProgressRecord};
use crate::settings::Settings;
use crate::shop::{PurchaseError, ShopCatalog, Skin};
use crate::sim::{
    GravitySign, Hud, LevelSession, SessionContext, SessionPhase, TickInput, TickOutcome, tick,
};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    LevelSelect,
    Shop,
    Controls,
    InGame,
}

/// What the renderer should draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MainMenu,
    LevelSelect,
    Shop,
    Controls,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
    Transition,
}

/// Saved position merged into the first matching Start Game
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResumePoint {
    level: u32,
    pos: Vec2,
    gravity: GravitySign,
    score: u64,
}

/// Flow controller: owns the session, profile and storage, and routes
/// menu actions between screens
pub struct Game {
    /// Latched host input; edges are cleared after every tick
    pub input: TickInput,
    screen: Screen,
    controls_from: Screen,
    session: LevelSession,
    profile: Profile,
    catalog: ShopCatalog,
    settings: Settings,
    gateway: Box<dyn ProgressGateway>,
    resume: Option<ResumePoint>,
    show_help: bool,
    running: bool,
}

impl Game {
    /// Load progress (best effort) and park on the main menu
    pub fn new(gateway: Box<dyn ProgressGateway>, settings: Settings, seed: u64) -> Self {
        let saved = gateway.load().unwrap_or_else(|e| {
            log::warn!("Progress not loaded, starting fresh: {}", e);
            None
        });
        let record = saved.clone().unwrap_or_default();
        let profile = Profile::from_record(&record);
        log::info!(
            "Profile: {} coins, {} levels unlocked, skin {}",
            profile.total_coins,
            profile.levels_unlocked,
            profile.equipped_skin
        );

        let ctx = SessionContext {
            particle_cap: settings.max_particles(),
            actor_color: profile.equipped_skin.color(),
            ..SessionContext::default()
        };
        let session = LevelSession::new(ctx, seed, 0);
        let resume = saved.map(|r| ResumePoint {
            level: r.level_index,
            pos: Vec2::new(r.actor_x, r.actor_y),
            gravity: GravitySign::from_i8(r.gravity_sign),
            score: r.session_score,
        });

        Self {
            input: TickInput::default(),
            screen: Screen::MainMenu,
            controls_from: Screen::MainMenu,
            session,
            profile,
            catalog: ShopCatalog::default(),
            settings,
            gateway,
            resume,
            show_help: false,
            running: true,
        }
    }

    /// Advance one frame. Outside of play only the input edges are consumed.
    pub fn tick(&mut self) -> TickOutcome {
        let input = self.input.clone();
        self.input.clear_edges();

        if !self.running || self.screen != Screen::InGame {
            return TickOutcome::default();
        }

        if input.toggle_help {
            self.show_help = !self.show_help;
        }
        if input.retry && self.retry() {
            return TickOutcome::default();
        }

        let outcome = tick(&mut self.session, &input);
        self.apply(&outcome);
        outcome
    }

    /// Coins and completion are written the tick they happen
    fn apply(&mut self, outcome: &TickOutcome) {
        let collected = !outcome.collected.is_empty();
        if collected {
            self.profile.total_coins += COIN_SCORE * outcome.collected.len() as u64;
        }
        if outcome.completed {
            self.profile.reach(self.session.level_index());
        }
        if collected || outcome.completed {
            self.save_progress();
        }
    }

    // --- Main menu ---

    /// Continue from the furthest level reached
    pub fn start_game(&mut self) {
        let level = self.profile.furthest_level_reached;
        self.session.load_level(level);
        if let Some(point) = self.resume.take().filter(|p| p.level == level) {
            log::info!("Resuming level {} at ({:.0}, {:.0})", level + 1, point.pos.x, point.pos.y);
            self.session.restore(point.pos, point.gravity, point.score);
        }
        self.enter_game();
    }

    pub fn open_level_select(&mut self) {
        if self.screen == Screen::MainMenu {
            self.screen = Screen::LevelSelect;
        }
    }

    /// Level-select buttons as `(index, unlocked)`
    pub fn level_slots(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        (0..LEVEL_SELECT_SLOTS).map(|i| (i, self.profile.is_unlocked(i)))
    }

    /// Start `index` if it is unlocked
    pub fn select_level(&mut self, index: u32) -> bool {
        if self.screen != Screen::LevelSelect || !self.profile.is_unlocked(index) {
            return false;
        }
        self.session.load_level(index);
        self.enter_game();
        true
    }

    pub fn open_shop(&mut self) {
        if self.screen == Screen::MainMenu {
            self.screen = Screen::Shop;
        }
    }

    pub fn open_controls(&mut self) {
        if self.screen != Screen::Controls {
            self.controls_from = self.screen;
            self.screen = Screen::Controls;
        }
    }

    /// Back to whichever screen opened the controls page
    pub fn close_controls(&mut self) {
        if self.screen == Screen::Controls {
            self.screen = self.controls_from;
        }
    }

    /// Leave level select, shop or controls
    pub fn back_to_menu(&mut self) {
        match self.screen {
            Screen::LevelSelect | Screen::Shop | Screen::Controls => self.screen = Screen::MainMenu,
            Screen::MainMenu | Screen::InGame => {}
        }
    }

    // --- Shop ---

    pub fn purchase(&mut self, skin_id: &str) -> Result<Skin, PurchaseError> {
        let skin = self.catalog.purchase(&mut self.profile, skin_id)?;
        self.session.set_actor_color(skin.color());
        self.save_progress();
        Ok(skin)
    }

    pub fn equip(&mut self, skin_id: &str) -> Result<Skin, PurchaseError> {
        let skin = self.catalog.equip(&mut self.profile, skin_id)?;
        self.session.set_actor_color(skin.color());
        self.save_progress();
        Ok(skin)
    }

    // --- In game ---

    pub fn retry(&mut self) -> bool {
        self.screen == Screen::InGame && self.session.retry()
    }

    /// Unlock the following level and fade into it
    pub fn advance(&mut self) -> bool {
        if self.screen != Screen::InGame || self.session.phase() != SessionPhase::LevelComplete {
            return false;
        }
        self.profile.unlock_through(self.session.level_index().saturating_add(1));
        self.save_progress();
        self.session.advance()
    }

    pub fn resume(&mut self) -> bool {
        self.screen == Screen::InGame && self.session.resume()
    }

    /// Save the attempt and leave it
    pub fn return_to_menu(&mut self) {
        if self.screen != Screen::InGame {
            return;
        }
        self.save_progress();
        self.session.return_to_menu();
        self.show_help = false;
        self.screen = Screen::MainMenu;
    }

    // --- Lifecycle ---

    pub fn quit(&mut self) {
        self.save_progress();
        self.running = false;
        log::info!("Quit");
    }

    /// Host is tearing the page down
    pub fn page_unload(&mut self) {
        self.save_progress();
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.session.set_particle_cap(settings.max_particles());
        settings.save();
        self.settings = settings;
    }

    fn enter_game(&mut self) {
        self.show_help = false;
        self.screen = Screen::InGame;
    }

    fn save_progress(&mut self) {
        let record = self.snapshot();
        match self.gateway.save(&record) {
            Ok(()) => log::info!("Progress saved (level {}, {} coins)", record.level_index + 1, record.total_coins),
            Err(e) => log::warn!("Progress not saved: {}", e),
        }
    }

    /// Current state as a persistable record
    pub fn snapshot(&self) -> ProgressRecord {
        let actor = self.session.actor();
        ProgressRecord {
            level_index: self.session.level_index(),
            session_score: self.session.score(),
            total_coins: self.profile.total_coins,
            levels_unlocked: self.profile.levels_unlocked,
            furthest_level_reached: self.profile.furthest_level_reached,
            actor_x: actor.pos.x,
            actor_y: actor.pos.y,
            gravity_sign: self.session.gravity().as_i8(),
            equipped_skin: self.profile.equipped_skin,
            purchased_skins: self.profile.purchased_skins.clone(),
        }
    }

    pub fn view(&self) -> View {
        match self.screen {
            Screen::MainMenu => View::MainMenu,
            Screen::LevelSelect => View::LevelSelect,
            Screen::Shop => View::Shop,
            Screen::Controls => View::Controls,
            Screen::InGame => match self.session.phase() {
                SessionPhase::Playing => View::Playing,
                SessionPhase::Paused => View::Paused,
                SessionPhase::GameOver => View::GameOver,
                SessionPhase::LevelComplete => View::LevelComplete,
                SessionPhase::Transitioning(_) => View::Transition,
            },
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            show_help: self.show_help,
            ..self.session.hud(self.profile.total_coins)
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn catalog(&self) -> &ShopCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
