use std::{collections::VecDeque, io::BufRead, path::PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wayfinder_core::{
    Answer, ConfirmationDialog, HeadlessRenderer, InputFrame, JsonMapStore, MapRegistry,
    MapStore, MarkerId, NavigationSession, PathDeletion, PathId, SpatialProbe, Vec2, Vec3,
    WayfinderConfig, WayfinderError,
};

fn main() -> wayfinder_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => WayfinderConfig::load(path)?,
        None => WayfinderConfig::default(),
    };
    let store = JsonMapStore::new(&cli.store);

    match cli.command {
        Commands::Maps { filter } => run_maps(&store, filter.as_deref().unwrap_or("")),
        Commands::Paths { map, filter } => {
            run_paths(&store, &map, filter.as_deref().unwrap_or(""))
        }
        Commands::Record {
            map,
            source,
            destination,
            waypoints,
        } => run_record(&store, &config, &map, &source, &destination, waypoints),
        Commands::Walk {
            map,
            source,
            destination,
            step,
        } => run_walk(&store, &config, &map, &source, &destination, step),
        Commands::DeletePath {
            map,
            source,
            destination,
            yes,
        } => run_delete_path(&store, &map, &source, &destination, yes),
    }
}

fn run_maps(store: &JsonMapStore, filter: &str) -> wayfinder_core::Result<()> {
    let registry = store.load()?;
    let current = registry.current_map().name();
    for map in registry.filter_by_name_prefix(filter) {
        let marker = if map.name() == current { "*" } else { " " };
        println!("{marker} {} ({} paths)", map.name(), map.path_count());
    }
    Ok(())
}

fn run_paths(store: &JsonMapStore, map: &str, filter: &str) -> wayfinder_core::Result<()> {
    let registry = store.load()?;
    let map = registry.map(map).ok_or_else(|| format!("unknown map `{map}`"))?;

    for path in map.filter_by_source_prefix(filter) {
        println!(
            "{} -> {}: {} waypoints, {:.2} m",
            path.source(),
            path.destination(),
            path.waypoint_count(),
            path.length()
        );
    }
    Ok(())
}

fn run_record(
    store: &JsonMapStore,
    config: &WayfinderConfig,
    map: &str,
    source: &str,
    destination: &str,
    waypoints: Vec<Vec3>,
) -> wayfinder_core::Result<()> {
    tracing::info!(map, source, destination, count = waypoints.len(), "recording path");

    let mut registry = store.load()?;
    let current = registry.switch_to(map)?;
    let id = match current.find_path(source, destination) {
        Some(existing) => existing.id(),
        None => current.create_path(source, destination)?.id(),
    };

    let mut session = NavigationSession::new(HeadlessRenderer::new(config.marker.clone()), config);
    session.begin_authoring(&registry, id)?;

    // Each waypoint is one tap, followed by a quiet frame once the touch
    // latency has passed so the tap is released as a gesture.
    let settle = config.input.touch_latency * 2.0;
    let mut probe = ScriptedSurface::new(waypoints);
    let mut time = 0.0;
    while probe.remaining() > 0 {
        let tap = InputFrame::new(time, Vec3::ZERO).with_touch(Vec2::default());
        session.tick(&registry, &tap, &mut probe);
        time += settle;
        let report = session.tick(&registry, &InputFrame::new(time, Vec3::ZERO), &mut probe);
        tracing::debug!(time, ?report, "authoring tick");
        time += settle;
    }

    session.commit_authoring(&mut registry)?;
    store.save(&registry)?;

    if let Some(path) = registry.path(id) {
        tracing::info!(
            waypoints = path.waypoint_count(),
            length = path.length(),
            store = ?store.path(),
            "saved path"
        );
    }
    Ok(())
}

fn run_walk(
    store: &JsonMapStore,
    config: &WayfinderConfig,
    map: &str,
    source: &str,
    destination: &str,
    step: f32,
) -> wayfinder_core::Result<()> {
    if !(step > 0.0) {
        return Err("--step must be positive".into());
    }

    let registry = store.load()?;
    let id = locate(&registry, map, source, destination)?;
    let waypoints = registry
        .path(id)
        .map(|path| path.waypoints().to_vec())
        .unwrap_or_default();
    let Some(&start) = waypoints.first() else {
        tracing::warn!(source, destination, "path has no waypoints; nothing to walk");
        return Ok(());
    };

    let mut session = NavigationSession::new(HeadlessRenderer::new(config.marker.clone()), config);
    session.begin_indicating(&registry, id)?;
    tracing::info!(
        source,
        destination,
        loading_distance = session.loading_distance(),
        "walking path"
    );

    let mut probe = ScriptedSurface::new(Vec::new());
    let mut time = 0.0;
    let mut viewpoint = start;
    let mut peak = 0;
    for target in waypoints.iter().copied() {
        let leg = viewpoint.distance(target);
        let steps = (leg / step).ceil().max(1.0) as usize;
        let from = viewpoint;
        for i in 1..=steps {
            viewpoint = from.lerp(target, i as f32 / steps as f32);
            time += 1.0;
            let report = session.tick(&registry, &InputFrame::new(time, viewpoint), &mut probe);
            if report.materialized > 0 {
                tracing::info!(
                    time,
                    ?viewpoint,
                    materialized = report.materialized,
                    next = session.next_waypoint_index(),
                    "waypoints came into range"
                );
            }
            peak = peak.max(session.markers().count());
        }
    }

    for (id, visual) in session.markers().renderer().frame(time) {
        tracing::debug!(?id, size = visual.size, color = ?visual.color, "marker pulse");
    }
    println!(
        "materialized {} of {} waypoints (peak {} live markers)",
        session.next_waypoint_index(),
        waypoints.len(),
        peak
    );

    session.end_indicating();
    Ok(())
}

fn run_delete_path(
    store: &JsonMapStore,
    map: &str,
    source: &str,
    destination: &str,
    yes: bool,
) -> wayfinder_core::Result<()> {
    let mut registry = store.load()?;
    let id = locate(&registry, map, source, destination)?;

    let mut dialog = TerminalDialog { assume_yes: yes };
    let mut deletion = PathDeletion::new();
    deletion.request(&registry, id, &mut dialog)?;
    let answer = dialog.read_answer()?;

    match deletion.resolve(&mut registry, answer) {
        Some(removed) => {
            store.save(&registry)?;
            tracing::info!(
                source = removed.source(),
                destination = removed.destination(),
                "deleted path"
            );
        }
        None => tracing::info!("kept path"),
    }
    Ok(())
}

fn locate(
    registry: &MapRegistry,
    map: &str,
    source: &str,
    destination: &str,
) -> wayfinder_core::Result<PathId> {
    let map = registry
        .map(map)
        .ok_or_else(|| WayfinderError::msg(format!("unknown map `{map}`")))?;
    map.find_path(source, destination)
        .map(|path| path.id())
        .ok_or_else(|| {
            WayfinderError::msg(format!(
                "no path from `{source}` to `{destination}` in `{}`",
                map.name()
            ))
        })
}

/// Surface hits replayed in order, standing in for AR ray-casting.
struct ScriptedSurface {
    hits: VecDeque<Vec3>,
}

impl ScriptedSurface {
    fn new(hits: Vec<Vec3>) -> Self {
        Self { hits: hits.into() }
    }

    fn remaining(&self) -> usize {
        self.hits.len()
    }
}

impl SpatialProbe<MarkerId> for ScriptedSurface {
    fn raycast_surface(&mut self, _screen: Vec2) -> Option<Vec3> {
        self.hits.pop_front()
    }

    fn pick_marker(&mut self, _screen: Vec2, _max_distance: f32) -> Option<MarkerId> {
        None
    }
}

struct TerminalDialog {
    assume_yes: bool,
}

impl TerminalDialog {
    fn read_answer(&self) -> wayfinder_core::Result<Answer> {
        if self.assume_yes {
            return Ok(Answer::Yes);
        }

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(match line.trim().to_lowercase().as_str() {
            "y" | "yes" => Answer::Yes,
            _ => Answer::No,
        })
    }
}

impl ConfirmationDialog for TerminalDialog {
    fn ask(&mut self, title: &str, message: &str) {
        println!("{title}: {message} [y/N]");
    }
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected `x,y,z`, got `{value}`"));
    };
    let parse = |part: &str| {
        part.parse::<f32>()
            .map_err(|err| format!("invalid coordinate `{part}`: {err}"))
    };
    let point = Vec3::new(parse(x)?, parse(y)?, parse(z)?);
    if !point.is_finite() {
        return Err(format!("coordinates must be finite, got `{value}`"));
    }
    Ok(point)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "AR wayfinding maps and paths", long_about = None)]
struct Cli {
    /// JSON file holding every map and path.
    #[arg(long, global = true, default_value = "maps.json")]
    store: PathBuf,
    /// Optional JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List maps, marking the current one.
    Maps {
        /// Only show maps whose name contains this text.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List the paths of a map with their lengths.
    Paths {
        #[arg(short, long)]
        map: String,
        /// Only show paths whose source contains this text.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Record a path by tapping the given world positions in order.
    Record {
        #[arg(short, long)]
        map: String,
        #[arg(short, long)]
        source: String,
        #[arg(short, long)]
        destination: String,
        /// Waypoints as `x,y,z`, with y pointing up.
        #[arg(required = true, value_parser = parse_vec3, allow_hyphen_values = true)]
        waypoints: Vec<Vec3>,
    },
    /// Replay a path while a simulated viewpoint walks along it.
    Walk {
        #[arg(short, long)]
        map: String,
        #[arg(short, long)]
        source: String,
        #[arg(short, long)]
        destination: String,
        /// Distance covered per update tick.
        #[arg(long, default_value_t = 0.5)]
        step: f32,
    },
    /// Delete a path after confirmation.
    DeletePath {
        #[arg(short, long)]
        map: String,
        #[arg(short, long)]
        source: String,
        #[arg(short, long)]
        destination: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}
