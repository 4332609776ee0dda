#![warn(missing_docs)]
//! Hex garden: drag flowers around a hexagonal board and watch them breed.
//!
//! Dropping a flower next to others activates them; every empty cell that
//! touches two or more activated flowers grows a child whose genome mixes
//! theirs.

mod garden;

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

/// Application-wide game state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Normal play: drag and breed.
    #[default]
    Running,
    /// Debug overlay active (Tab to toggle).
    Debugging,
}

#[cfg(feature = "native")]
mod cli {
    use clap::{Parser, ValueEnum};
    use hex_garden::SeedLayout;

    use crate::garden::GardenConfig;

    /// Command-line overrides for the garden defaults.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    pub struct Cli {
        /// Rings around the centre cell.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        radius: Option<u32>,
        /// Hex edge length in world units.
        #[arg(long, value_parser = positive_size)]
        hex_size: Option<f32>,
        /// Seed for reproducible genomes and breeding.
        #[arg(long)]
        seed: Option<u64>,
        /// Initial flower placement.
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    }

    fn positive_size(arg: &str) -> Result<f32, String> {
        let size: f32 = arg.parse().map_err(|e| format!("{e}"))?;
        if size.is_finite() && size > 0.0 {
            Ok(size)
        } else {
            Err(format!("hex size must be a positive number, got {arg}"))
        }
    }

    #[derive(ValueEnum, Clone, Copy, Debug)]
    enum LayoutArg {
        Corners,
        Full,
        Empty,
    }

    impl From<LayoutArg> for SeedLayout {
        fn from(arg: LayoutArg) -> Self {
            match arg {
                LayoutArg::Corners => SeedLayout::Corners,
                LayoutArg::Full => SeedLayout::Full,
                LayoutArg::Empty => SeedLayout::Empty,
            }
        }
    }

    impl Cli {
        /// Writes every given flag over `config`.
        pub fn apply(self, config: &mut GardenConfig) {
            if let Some(radius) = self.radius {
                config.board.radius = radius;
            }
            if let Some(hex_size) = self.hex_size {
                config.board.hex_size = hex_size;
            }
            if self.seed.is_some() {
                config.board.seed = self.seed;
            }
            if let Some(layout) = self.layout {
                config.board.layout = layout.into();
            }
        }
    }
}

fn main() {
    let config = garden::GardenConfig::default();
    #[cfg(feature = "native")]
    let config = {
        let mut config = config;
        <cli::Cli as clap::Parser>::parse().apply(&mut config);
        config
    };

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Garden".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>();

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(garden::GardenPlugin(config))
        .add_systems(Update, exit_on_esc)
        .add_systems(Update, toggle_inspector)
        .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        };
        info!(state = ?new_state, "toggled inspector");
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
