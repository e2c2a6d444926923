//! Interactive 3D viewer using kiss3d.
//!
//! The engine owns the puzzle; the viewer only draws it. Every piece is drawn
//! where the engine says it is, and a running turn is shown by rotating the
//! moved pieces back from their committed positions by the angle still left
//! to play.

use std::time::Instant;

use kiss3d::prelude::*;

use cubemorph::engine::{Animation, Effect};
use cubemorph::geometry::{self, Axis};
use cubemorph::mask::{compute_mask, exterior_faces, Face, FaceMask, Pattern};
use cubemorph::shape::{ShapeStep, PYRAMORPHIX_APEXES};
use cubemorph::slots::{kind, slot_coord, Coord, SlotKind, SLOT_COUNT};
use cubemorph::{Command, MoveEngine, MoveToken, PieceId, Presenter};

pub const CONTROLS: &str = "Controls: L M R U E D F S B X Y Z turn (hold Shift to reverse), \
     W two-layer grip, Backspace undo, Space shuffle, Return reset, H hide next, \
     P cycle highlight, 1-4 shapes";

/// Size of a unit piece (slightly smaller than 1.0 for visible gaps).
const PIECE_SIZE: f32 = 0.95;
/// Thickness of a sticker plate.
const STICKER_DEPTH: f32 = 0.04;
/// Edge length of a sticker plate.
const STICKER_SIZE: f32 = 0.8;

fn face_color(face: Face) -> Color {
    match face {
        Face::PosX => Color::new(0.8, 0.1, 0.1, 1.0), // red
        Face::NegX => Color::new(1.0, 0.5, 0.0, 1.0), // orange
        Face::PosY => Color::new(1.0, 1.0, 1.0, 1.0), // white
        Face::NegY => Color::new(1.0, 0.9, 0.1, 1.0), // yellow
        Face::PosZ => Color::new(0.1, 0.7, 0.2, 1.0), // green
        Face::NegZ => Color::new(0.1, 0.3, 0.9, 1.0), // blue
    }
}

fn body_color() -> Color {
    Color::new(0.08, 0.08, 0.08, 1.0)
}

/// Stickers left out of the highlight pattern.
fn neutral_color() -> Color {
    Color::new(0.45, 0.45, 0.45, 1.0)
}

fn to_vec3((x, y, z): Coord) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Rotates a point about a principal axis (right-hand rule).
fn rotate_about(axis: Axis, degrees: f32, v: Vec3) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    match axis {
        Axis::X => Vec3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos),
        Axis::Y => Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos),
        Axis::Z => Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z),
    }
}

/// How far along each structural change the drawing is, each in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    /// 1 with the middle layers present, 0 when shrunk away.
    middles: f32,
    /// 0 at unit size, 1 when grown to fill a 2x2.
    corners: f32,
    /// 0 as a cube, 1 fully morphed.
    morph: f32,
}

impl Layout {
    fn of(engine: &MoveEngine) -> Self {
        let shape = engine.shape();
        let reduced = if shape.is_reduced() { 1.0 } else { 0.0 };
        Self {
            middles: 1.0 - reduced,
            corners: reduced,
            morph: if shape.is_pyramorphix() { 1.0 } else { 0.0 },
        }
    }

    /// The layout partway through a step, `t` in `0..=1`.
    fn during(mut self, step: ShapeStep, t: f32) -> Self {
        let toward = |from: f32, to: f32| from + (to - from) * t;
        match step {
            ShapeStep::ScaleMiddlesIn => self.middles = toward(self.middles, 0.0),
            ShapeStep::ScaleMiddlesOut => self.middles = toward(self.middles, 1.0),
            ShapeStep::ScaleCornersOut => self.corners = toward(self.corners, 1.0),
            ShapeStep::ScaleCornersIn => self.corners = toward(self.corners, 0.0),
            ShapeStep::MorphToPyramorphix => self.morph = toward(self.morph, 1.0),
            ShapeStep::MorphToCube => self.morph = toward(self.morph, 0.0),
        }
        self
    }

    /// Whole-puzzle tilt in degrees about the vertical axis.
    fn tilt(&self) -> f32 {
        let full = ShapeStep::MorphToPyramorphix
            .tilt()
            .map_or(0.0, |(_, degrees)| degrees as f32);
        full * self.morph
    }
}

/// A rendered node belonging to one piece.
struct RenderedNode {
    node: SceneNode3d,
    /// Position before any running turn and before the tilt.
    base_position: Vec3,
    piece: PieceId,
}

/// An animation being played and when it started.
struct Playing {
    animation: Animation,
    started: Instant,
}

impl Playing {
    fn progress(&self) -> f32 {
        let total = self.animation.duration().as_secs_f32();
        if total <= 0.0 {
            1.0
        } else {
            (self.started.elapsed().as_secs_f32() / total).min(1.0)
        }
    }
}

/// The viewer's side of the presentation contract.
struct Viewer {
    nodes: Vec<RenderedNode>,
    layout: Layout,
    pattern: Pattern,
    mask: [FaceMask; SLOT_COUNT],
    playing: Option<Playing>,
    dirty: bool,
}

impl Viewer {
    fn new(engine: &MoveEngine) -> Self {
        Self {
            nodes: Vec::new(),
            layout: Layout::of(engine),
            pattern: Pattern::All,
            mask: compute_mask(Pattern::All),
            playing: None,
            dirty: true,
        }
    }

    fn cycle_pattern(&mut self) {
        let index = Pattern::ALL
            .iter()
            .position(|&p| p == self.pattern)
            .map_or(0, |i| (i + 1) % Pattern::ALL.len());
        self.pattern = Pattern::ALL[index];
        self.mask = compute_mask(self.pattern);
        self.dirty = true;
    }

    /// Rebuilds every node from the engine's committed state.
    fn rebuild(&mut self, scene: &mut SceneNode3d, engine: &MoveEngine, layout: Layout) {
        for mut rendered in self.nodes.drain(..) {
            rendered.node.remove();
        }

        let state = engine.state();
        for piece in 0..SLOT_COUNT {
            if engine.hidden().contains(&piece) {
                continue;
            }
            let home = state.home_slot(piece);
            let is_corner = kind(home) == SlotKind::Corner;
            let is_apex = PYRAMORPHIX_APEXES.contains(&home);

            let mut size = if is_corner {
                PIECE_SIZE + 0.5 * layout.corners
            } else {
                PIECE_SIZE * layout.middles
            };
            let mut center = to_vec3(slot_coord(state.slot_of(piece)));
            if is_corner {
                // grown corners close in so the 2x2 stays compact
                center *= 1.0 - 0.25 * layout.corners;
            }
            if is_apex {
                center *= 1.0 + 0.35 * layout.morph;
            } else {
                size *= 1.0 - 0.3 * layout.morph;
            }
            if size < 0.01 {
                continue;
            }

            let body = scene
                .add_cube(size, size, size)
                .set_color(body_color())
                .set_position(center);
            self.nodes.push(RenderedNode {
                node: body,
                base_position: center,
                piece,
            });

            let rotation = state.orientation(piece);
            for face in exterior_faces(home).faces() {
                let (ax, ay, az) = face.axis().unit();
                let sign = face.sign();
                let normal = to_vec3(geometry::rotate(rotation, (ax * sign, ay * sign, az * sign)));
                let extent = |component: f32| {
                    if component.abs() > 0.5 {
                        STICKER_DEPTH
                    } else {
                        STICKER_SIZE * size
                    }
                };
                let color = if self.mask[home].contains(face) {
                    face_color(face)
                } else {
                    neutral_color()
                };
                let position = center + normal * (size / 2.0 + STICKER_DEPTH / 2.0);
                let sticker = scene
                    .add_cube(extent(normal.x), extent(normal.y), extent(normal.z))
                    .set_color(color)
                    .set_position(position);
                self.nodes.push(RenderedNode {
                    node: sticker,
                    base_position: position,
                    piece,
                });
            }
        }

        self.place(None, layout);
    }

    /// Positions nodes, rotating the turning pieces back by the angle left.
    fn place(&mut self, turn: Option<(&[PieceId], Axis, f32)>, layout: Layout) {
        let tilt = layout.tilt();
        for rendered in &mut self.nodes {
            let mut position = rendered.base_position;
            if let Some((pieces, axis, remaining)) = turn {
                if pieces.contains(&rendered.piece) {
                    position = rotate_about(axis, -remaining, position);
                }
            }
            rendered
                .node
                .set_position(rotate_about(Axis::Y, tilt, position));
        }
    }

    /// Advances the current animation; reports completion to the engine.
    fn update(&mut self, scene: &mut SceneNode3d, engine: &mut MoveEngine) {
        if self.playing.is_none() {
            if let Some(animation) = engine.tick() {
                self.play(&animation);
            }
        }

        let Some((t, animation)) = self
            .playing
            .as_ref()
            .map(|playing| (playing.progress(), playing.animation.clone()))
        else {
            if self.dirty {
                self.rebuild(scene, engine, self.layout);
                self.dirty = false;
            }
            return;
        };

        match &animation {
            Animation::Turn(turn) => {
                if self.dirty {
                    self.rebuild(scene, engine, self.layout);
                    self.dirty = false;
                }
                let remaining = turn.degrees as f32 * (1.0 - t);
                self.place(Some((&turn.pieces, turn.axis, remaining)), self.layout);
            }
            Animation::Shape(step) => {
                let layout = self.layout.during(step.step, t);
                self.rebuild(scene, engine, layout);
            }
        }

        if t >= 1.0 {
            self.playing = None;
            if let Animation::Shape(step) = &animation {
                self.layout = self.layout.during(step.step, 1.0);
            }
            self.dirty = true;
            if let Some(next) = engine.complete() {
                self.play(&next);
            }
        }
    }
}

impl Presenter for Viewer {
    fn play(&mut self, animation: &Animation) {
        self.playing = Some(Playing {
            animation: animation.clone(),
            started: Instant::now(),
        });
        self.dirty = true;
    }

    fn set_visibility(&mut self, _pieces: &[PieceId], _hidden: bool) {
        // hidden pieces are read back from the engine on rebuild
        self.dirty = true;
    }

    fn reset(&mut self) {
        self.dirty = true;
    }
}

/// Keyboard state that turns key presses into commands.
#[derive(Default)]
struct Keys {
    shift: bool,
    wide: bool,
}

impl Keys {
    fn command(&mut self, key: kiss3d::event::Key) -> Option<Command> {
        use kiss3d::event::Key;

        let letter = match key {
            Key::L => 'l',
            Key::M => 'm',
            Key::R => 'r',
            Key::U => 'u',
            Key::E => 'e',
            Key::D => 'd',
            Key::F => 'f',
            Key::S => 's',
            Key::B => 'b',
            Key::X => 'x',
            Key::Y => 'y',
            Key::Z => 'z',
            Key::W => {
                self.wide = !self.wide;
                return None;
            }
            Key::Back => return Some(Command::Undo),
            Key::Space => return Some(Command::Shuffle),
            Key::Return => return Some(Command::Reset),
            Key::H => return Some(Command::ToggleHideNext),
            Key::Key1 => return Some(Command::SetShape(cubemorph::ShapeState::Standard3x3)),
            Key::Key2 => return Some(Command::SetShape(cubemorph::ShapeState::Reduced2x2)),
            Key::Key3 => return Some(Command::SetShape(cubemorph::ShapeState::Pyramorphix)),
            Key::Key4 => {
                return Some(Command::SetShape(cubemorph::ShapeState::ReducedPyramorphix))
            }
            _ => return None,
        };

        let cased = if self.shift {
            letter.to_ascii_uppercase()
        } else {
            letter
        };
        let token = MoveToken::new(cased);
        let wide = self.wide && cubemorph::catalog::adjacent(letter).is_some();
        Some(Command::Move(if wide { token.widened() } else { token }))
    }
}

fn title(engine: &MoveEngine, viewer: &Viewer, keys: &Keys) -> String {
    format!(
        "cubemorph - {} - highlight {}{}{}{}",
        engine.shape(),
        viewer.pattern,
        if keys.wide { " - two-layer" } else { "" },
        if engine.hide_next() { " - hide next" } else { "" },
        if engine.state().is_solved() { " - solved" } else { "" },
    )
}

/// Opens the viewer and runs until the window is closed.
pub fn display(engine: MoveEngine) {
    pollster::block_on(display_async(engine));
}

async fn display_async(mut engine: MoveEngine) {
    let mut window = Window::new("cubemorph").await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(9.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 6.0, 7.0));

    let mut viewer = Viewer::new(&engine);
    let mut keys = Keys::default();

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if matches!(key, Key::LShift | Key::RShift) {
                    keys.shift = action == Action::Press;
                    continue;
                }
                if action != Action::Press {
                    continue;
                }
                if key == Key::P {
                    viewer.cycle_pattern();
                    continue;
                }
                let Some(command) = keys.command(key) else {
                    continue;
                };
                match engine.execute(command) {
                    Ok(Effect::Ignored(reason)) => tracing::debug!(?command, ?reason, "ignored"),
                    Ok(effect) => {
                        cubemorph::present(&mut viewer, &effect);
                        if matches!(effect, Effect::Reset) {
                            viewer.playing = None;
                            viewer.layout = Layout::of(&engine);
                        }
                    }
                    Err(err) => tracing::info!(?command, %err, "command rejected"),
                }
            }
        }

        viewer.update(&mut scene, &mut engine);
        window.set_title(&title(&engine, &viewer, &keys));

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
