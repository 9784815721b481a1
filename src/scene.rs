//! Scene layers and layout
//!
//! Four layers: Start, Play (wheel + arrow), the Jackpot overlay with the
//! prize labels, and End. Attachment and visibility are derived from the
//! game phase in one place (`sync`), so the layers can never disagree with
//! the state machine.

use glam::Vec2;

use crate::assets::AssetStore;
use crate::consts::ARROW_SCALE;
use crate::error::GameError;
use crate::sim::{GamePhase, GameState};

/// Prize-label slot offset from viewport center, in pixels
const SLOT_OFFSET: f32 = 90.0;

/// Purple tint used for the interactive labels
const ACCENT_TINT: u32 = 0xb82be2;

/// A visibility-toggle container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Start,
    Play,
    JackpotOverlay,
    End,
}

impl Layer {
    const ALL: [Layer; 4] = [Layer::Start, Layer::Play, Layer::JackpotOverlay, Layer::End];

    fn index(self) -> usize {
        match self {
            Layer::Start => 0,
            Layer::Play => 1,
            Layer::JackpotOverlay => 2,
            Layer::End => 3,
        }
    }
}

/// What a scene node draws
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Center-anchored sprite backed by a named texture
    Sprite { texture: String },
    /// Bitmap text in the loaded font family
    Text { text: String, font_size: f32, tint: u32 },
}

/// One node in a layer
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: Vec2,
    pub scale: f32,
    pub rotation: f32,
    pub interactive: bool,
}

impl Node {
    fn text(text: impl Into<String>, font_size: f32, pos: Vec2) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.into(),
                font_size,
                tint: 0xffffff,
            },
            pos,
            scale: 1.0,
            rotation: 0.0,
            interactive: false,
        }
    }

    fn tinted(mut self, tint: u32) -> Self {
        if let NodeKind::Text { tint: t, .. } = &mut self.kind {
            *t = tint;
        }
        self
    }

    fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }
}

/// Per-layer container state
#[derive(Debug, Default)]
pub struct LayerState {
    pub attached: bool,
    pub visible: bool,
    pub nodes: Vec<Node>,
}

/// Viewport-derived placement of every fixed element
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wheel sprite position: viewport center
    pub fn wheel_pos(&self) -> Vec2 {
        self.center()
    }

    /// Arrow sprite position: one-third viewport width, vertical center
    pub fn arrow_pos(&self) -> Vec2 {
        Vec2::new(self.width / 3.0, self.height / 2.0)
    }

    /// The seven fixed prize-label slots around the wheel
    ///
    /// Slot positions are independent of the shuffle; only the label-to-slot
    /// mapping changes per session.
    pub fn prize_slots(&self) -> [Vec2; 7] {
        let c = self.center();
        let o = SLOT_OFFSET;
        [
            Vec2::new(c.x - o - 80.0, c.y),
            Vec2::new(c.x + o + 45.0, c.y + 10.0),
            Vec2::new(c.x - o - 80.0, c.y - o - 30.0),
            Vec2::new(c.x + o - 40.0, c.y + o + 30.0),
            Vec2::new(c.x - o, c.y + o + 30.0),
            Vec2::new(c.x + o, c.y - o - 20.0),
            Vec2::new(c.x - o + 60.0, c.y - o - 100.0),
        ]
    }
}

/// The scene graph: four layers plus cached wheel geometry
#[derive(Debug)]
pub struct SceneGraph {
    layers: [LayerState; 4],
    layout: Layout,
    wheel_radius: f32,
    end_built: bool,
}

impl SceneGraph {
    /// Build the scene. Requires a ready asset store; any texture miss is
    /// fatal here rather than a blank sprite later.
    pub fn build(layout: Layout, assets: &AssetStore) -> Result<Self, GameError> {
        if !assets.is_ready() {
            return Err(GameError::asset_load("scene", "asset store not ready"));
        }

        let wheel_tex = assets.texture("wheel")?;
        // Arrow lookup must succeed even though SDF rendering ignores the bytes
        let _arrow_tex = assets.texture("arrow")?;

        let mut layers: [LayerState; 4] = Default::default();

        // Start screen
        let start = &mut layers[Layer::Start.index()];
        start.nodes.push(Node::text(
            "Spin the Wheel Game!",
            69.0,
            Vec2::new(layout.width / 2.0, 69.0),
        ));
        start.nodes.push(Node::text(
            "Click anywhere on the wheel to try your luck!",
            25.0,
            Vec2::new(layout.width / 2.0, 69.0 + 75.0),
        ));
        start.nodes.push(
            Node::text("Start Game", 50.0, layout.center())
                .tinted(ACCENT_TINT)
                .interactive(),
        );
        start.attached = true;
        start.visible = true;

        // Play layer: wheel + arrow sprites
        let play = &mut layers[Layer::Play.index()];
        play.nodes.push(Node {
            kind: NodeKind::Sprite {
                texture: "wheel".into(),
            },
            pos: layout.wheel_pos(),
            scale: 1.0,
            rotation: 0.0,
            interactive: true,
        });
        play.nodes.push(Node {
            kind: NodeKind::Sprite {
                texture: "arrow".into(),
            },
            pos: layout.arrow_pos(),
            scale: ARROW_SCALE,
            rotation: 0.0,
            interactive: false,
        });
        play.attached = true;

        // Jackpot overlay starts hidden; nodes are filled per session below
        layers[Layer::JackpotOverlay.index()].attached = true;

        // End layer is attached only once the game is over

        Ok(Self {
            layers,
            layout,
            wheel_radius: wheel_tex.half_size().min_element(),
            end_built: false,
        })
    }

    /// Create the prize-label text nodes on the overlay layer
    ///
    /// Called once, after the shuffle, so labels land on the fixed slots in
    /// post-shuffle order.
    pub fn place_prize_labels(&mut self, labels: &[String]) {
        let slots = self.layout.prize_slots();
        let overlay = &mut self.layers[Layer::JackpotOverlay.index()];
        overlay.nodes.clear();
        for (label, slot) in labels.iter().zip(slots) {
            overlay.nodes.push(Node::text(label.clone(), 20.0, slot));
        }
    }

    pub fn layer(&self, layer: Layer) -> &LayerState {
        &self.layers[layer.index()]
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Hit radius of the center-anchored wheel sprite
    pub fn wheel_radius(&self) -> f32 {
        self.wheel_radius
    }

    /// Drive attachment and visibility from the authoritative phase, and
    /// mirror the wheel rotation into the sprite node.
    pub fn sync(&mut self, state: &GameState) {
        match state.phase {
            GamePhase::Start => {
                self.set_layer(Layer::Start, true, true);
                self.set_layer(Layer::Play, true, false);
                self.set_layer(Layer::JackpotOverlay, true, false);
                self.set_layer(Layer::End, false, false);
            }
            GamePhase::Playing => {
                // Start screen is removed from the root, not just hidden
                self.set_layer(Layer::Start, false, false);
                self.set_layer(Layer::Play, true, true);
                self.set_layer(Layer::JackpotOverlay, true, false);
            }
            GamePhase::Revealing => {
                self.set_layer(Layer::JackpotOverlay, true, true);
                self.set_layer(Layer::Play, true, true);
            }
            GamePhase::Ended => {
                self.set_layer(Layer::Play, false, false);
                self.set_layer(Layer::JackpotOverlay, false, false);
                if !self.end_built {
                    self.build_end_screen(state);
                }
                self.set_layer(Layer::End, true, true);
            }
        }

        if let Some(wheel) = self.layers[Layer::Play.index()].nodes.first_mut() {
            wheel.rotation = state.rotation;
        }
    }

    fn build_end_screen(&mut self, state: &GameState) {
        let layout = self.layout;
        let end = &mut self.layers[Layer::End.index()];
        end.nodes.push(Node::text(
            "GAME OVER!!",
            100.0,
            Vec2::new(layout.width / 2.0, 100.0),
        ));
        let won = state.winning_label().unwrap_or("nothing");
        end.nodes
            .push(Node::text(format!("You won: {won}"), 75.0, layout.center()).tinted(ACCENT_TINT));
        self.end_built = true;
    }

    fn set_layer(&mut self, layer: Layer, attached: bool, visible: bool) {
        let l = &mut self.layers[layer.index()];
        l.attached = attached;
        l.visible = visible;
    }

    /// The win-announcement line, once the End screen exists
    pub fn win_text(&self) -> Option<&str> {
        self.layers[Layer::End.index()].nodes.iter().find_map(|n| match &n.kind {
            NodeKind::Text { text, .. } if text.starts_with("You won") => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether a pointer position lands on the wheel sprite
    pub fn wheel_hit(&self, pos: Vec2) -> bool {
        let play = self.layer(Layer::Play);
        if !(play.attached && play.visible) {
            return false;
        }
        pos.distance(self.layout.wheel_pos()) <= self.wheel_radius
    }

    /// Sanity check: at most one of {Start, Play} and at most one of
    /// {JackpotOverlay visible pre-reveal, End} should be showing
    pub fn visible_layers(&self) -> Vec<Layer> {
        Layer::ALL
            .into_iter()
            .filter(|l| {
                let s = self.layer(*l);
                s.attached && s.visible
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetManifest, AssetStore, MANIFEST_JSON};
    use crate::consts::SIM_DT;
    use crate::sim::{GameState, TickInput, run_ticks, tick};

    fn ready_store() -> AssetStore {
        let manifest = AssetManifest::from_json(MANIFEST_JSON).unwrap();
        let mut store = AssetStore::resolve(&manifest).unwrap();
        store.finish();
        store
    }

    fn scene(w: f32, h: f32) -> SceneGraph {
        SceneGraph::build(Layout::new(w, h), &ready_store()).unwrap()
    }

    #[test]
    fn test_build_requires_ready_store() {
        let manifest = AssetManifest::from_json(MANIFEST_JSON).unwrap();
        let store = AssetStore::resolve(&manifest).unwrap();
        assert!(SceneGraph::build(Layout::new(800.0, 600.0), &store).is_err());
    }

    #[test]
    fn test_construction_bounds() {
        let scene = scene(1280.0, 720.0);
        let play = scene.layer(Layer::Play);
        assert_eq!(play.nodes[0].pos, Vec2::new(640.0, 360.0));
        assert_eq!(play.nodes[1].pos, Vec2::new(1280.0 / 3.0, 360.0));
        assert_eq!(play.nodes[1].scale, 0.5);
    }

    #[test]
    fn test_initial_layer_state() {
        let scene = scene(800.0, 600.0);
        assert!(scene.layer(Layer::Start).attached && scene.layer(Layer::Start).visible);
        assert!(scene.layer(Layer::Play).attached && !scene.layer(Layer::Play).visible);
        let overlay = scene.layer(Layer::JackpotOverlay);
        assert!(overlay.attached && !overlay.visible);
        assert!(!scene.layer(Layer::End).attached);
    }

    #[test]
    fn test_prize_labels_on_fixed_slots() {
        let mut scene = scene(800.0, 600.0);
        let state = GameState::new(11);
        scene.place_prize_labels(state.prizes.labels());

        assert_eq!(scene.layer(Layer::JackpotOverlay).nodes.len(), 7);
        let slots = scene.layout().prize_slots();
        for (node, slot) in scene.layer(Layer::JackpotOverlay).nodes.iter().zip(slots) {
            assert_eq!(node.pos, slot);
        }
        assert_eq!(slots[0], Vec2::new(400.0 - 170.0, 300.0));
        assert_eq!(slots[6], Vec2::new(400.0 - 30.0, 300.0 - 190.0));
    }

    #[test]
    fn test_start_transition_detaches_start() {
        let mut scene = scene(800.0, 600.0);
        let mut state = GameState::new(2);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);
        scene.sync(&state);

        assert!(!scene.layer(Layer::Start).attached);
        assert!(scene.layer(Layer::Play).visible);

        // Idempotent on a second trigger
        tick(&mut state, &start, SIM_DT);
        scene.sync(&state);
        assert!(!scene.layer(Layer::Start).attached);
        assert_eq!(scene.visible_layers(), vec![Layer::Play]);
    }

    #[test]
    fn test_win_transition_and_text() {
        let mut scene = scene(800.0, 600.0);
        let mut state = GameState::new(77);
        scene.place_prize_labels(state.prizes.labels());

        run_ticks(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            1,
        );
        run_ticks(
            &mut state,
            &TickInput {
                spin: true,
                ..Default::default()
            },
            crate::consts::ANNOUNCE_DELAY_TICKS + 1,
        );
        assert_eq!(state.phase, GamePhase::Ended);
        scene.sync(&state);

        assert!(!scene.layer(Layer::Play).attached);
        assert!(!scene.layer(Layer::JackpotOverlay).attached);
        assert!(scene.layer(Layer::End).attached && scene.layer(Layer::End).visible);

        let expected = format!("You won: {}", state.winning_label().unwrap());
        assert_eq!(scene.win_text(), Some(expected.as_str()));
    }

    #[test]
    fn test_wheel_hit() {
        let mut scene = scene(800.0, 600.0);
        let mut state = GameState::new(4);

        // Play layer hidden: clicks pass through
        assert!(!scene.wheel_hit(Vec2::new(400.0, 300.0)));

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        scene.sync(&state);
        // Wheel radius comes from the 569x566 texture, center-anchored
        assert!(scene.wheel_hit(Vec2::new(400.0, 300.0)));
        assert!(scene.wheel_hit(Vec2::new(400.0 + 280.0, 300.0)));
        assert!(!scene.wheel_hit(Vec2::new(400.0 + 300.0, 300.0)));
    }

    #[test]
    fn test_wheel_rotation_mirrors_state() {
        let mut scene = scene(800.0, 600.0);
        let mut state = GameState::new(9);
        state.rotation = 1.5;
        scene.sync(&state);
        assert_eq!(scene.layer(Layer::Play).nodes[0].rotation, 1.5);
    }
}
