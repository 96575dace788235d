//! The frame driver: per-frame signal sampling, normative draw order, and
//! slice-mode rendering.

use crate::boss::{Boss, BOSS_RADIUS};
use crate::frame::{FrameBuffer, BLACK};
use crate::glitch::Glitch;
use crate::luts::TrigLut;
use crate::particles::{BassHitPool, ParticlePool};
use crate::projectile::ProjectilePool;
use crate::ship::Ship;
use crate::signals::{FrameSignals, SignalSource};
use crate::terrain::Terrain;
use pulsar_audio::{Timeline, SAMPLE_RATE, STEPS_PER_SEGMENT};

/// Renderer configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Chaos mode: spiral particle bursts every frame and hair-trigger
    /// spawn thresholds. Parameter overrides only, not a separate pipeline.
    pub chaos: bool,
}

/// All per-video rendering state. One renderer per worker; instances share
/// nothing.
pub struct FrameRenderer {
    fb: FrameBuffer,
    lut: TrigLut,
    terrain: Terrain,
    ship: Ship,
    boss: Boss,
    particles: ParticlePool,
    bass_hits: BassHitPool,
    projectiles: ProjectilePool,
    glitch: Glitch,
    options: RenderOptions,
    /// Saw-step sample marks (steps 0, 8, 16, 24 of the segment, repeating).
    saw_marks: Vec<u64>,
    saw_cursor: usize,
}

impl FrameRenderer {
    pub fn new(seed: u32, options: RenderOptions) -> Self {
        Self {
            fb: FrameBuffer::new(),
            lut: TrigLut::new(),
            terrain: Terrain::from_seed(seed),
            ship: Ship::from_seed(seed),
            boss: Boss::from_seed(seed),
            particles: ParticlePool::new(seed),
            bass_hits: BassHitPool::new(seed),
            projectiles: ProjectilePool::new(seed),
            glitch: Glitch::new(seed),
            options,
            saw_marks: Vec::new(),
            saw_cursor: 0,
        }
    }

    /// Precomputes saw-step marks from the sidecar so bass hits can trigger
    /// on the exact frames containing steps 0, 8, 16, 24.
    pub fn load_saw_steps(&mut self, timeline: &Timeline) {
        let step = u64::from(timeline.step_samples);
        self.saw_marks = (0..u64::from(STEPS_PER_SEGMENT))
            .filter(|s| s % 8 == 0)
            .map(|s| s * step)
            .collect();
        self.saw_cursor = 0;
    }

    fn saw_step_in_frame(&mut self, frame: u64) -> bool {
        let win_start = frame * u64::from(SAMPLE_RATE) / 60;
        let win_end = (frame + 1) * u64::from(SAMPLE_RATE) / 60;
        let mut hit = false;
        while self.saw_cursor < self.saw_marks.len() && self.saw_marks[self.saw_cursor] < win_end {
            if self.saw_marks[self.saw_cursor] >= win_start {
                hit = true;
            }
            self.saw_cursor += 1;
        }
        hit
    }

    /// Advances simulation state and, when `draw` is set, renders the frame.
    ///
    /// The draw order is normative: terrain, spawns, transients, ship, boss,
    /// glitch. Slice mode calls this with `draw = false` to fast-forward to
    /// the start of its range, which keeps sliced output pixel-identical to
    /// a full render.
    pub fn step_frame(&mut self, frame: u64, sig: &FrameSignals, draw: bool) -> Option<&FrameBuffer> {
        let (ship_x, ship_y) = self.ship.position(&self.lut, frame, sig.level);
        let (boss_x, boss_y) = self.boss.centroid();

        // Spawns react to the beat and the saw steps.
        self.glitch.update(sig.beat_now);
        if sig.beat_now && sig.level > 0.0 {
            self.particles.explode(
                boss_x,
                boss_y,
                sig.level,
                sig.hue_base,
            );
        }
        if self.options.chaos {
            self.particles
                .spiral_burst(f64::from(ship_x), f64::from(ship_y), frame, sig.hue_base);
        }
        if self.saw_step_in_frame(frame) && sig.bass > 0.0 {
            self.bass_hits
                .spawn(f64::from(ship_x) + 150.0, 350.0, sig.bass * 0.2);
        }

        self.particles.update();
        self.bass_hits.update();
        self.projectiles.update(
            (ship_x, ship_y),
            (boss_x, boss_y),
            BOSS_RADIUS,
            sig.level,
        );

        if !draw {
            return None;
        }

        self.fb.clear(BLACK);
        self.terrain.draw_bottom(&mut self.fb, frame, sig.level);
        self.terrain
            .draw_top(&mut self.fb, &self.lut, frame, sig.level, sig.treble);
        self.particles.draw(&mut self.fb);
        self.bass_hits.draw(&mut self.fb, &self.lut, frame);
        self.projectiles.draw(&mut self.fb);
        self.ship.draw(&mut self.fb, &self.lut, frame, sig.level);
        self.boss.draw(&mut self.fb, &self.lut, frame, sig.level);
        self.glitch.apply(&mut self.fb, frame, sig.level);
        Some(&self.fb)
    }

    /// Live transient counts `(particles, bass_hits, projectiles)`.
    pub fn pool_counts(&self) -> (usize, usize, usize) {
        (
            self.particles.live_count(),
            self.bass_hits.live_count(),
            self.projectiles.live_count(),
        )
    }
}

/// Renders frames `[start, end)` from a signal source, invoking `sink` for
/// each drawn frame. Frames before `start` are simulated but not drawn.
pub fn render_range<S, F, E>(
    renderer: &mut FrameRenderer,
    source: &mut S,
    start: u64,
    end: u64,
    mut sink: F,
) -> Result<(), E>
where
    S: SignalSource,
    F: FnMut(u64, &FrameBuffer) -> Result<(), E>,
{
    for frame in 0..end {
        let sig = source.advance(frame);
        let drawn = renderer.step_frame(frame, &sig, frame >= start);
        if let Some(fb) = drawn {
            sink(frame, fb)?;
        }
    }
    Ok(())
}
