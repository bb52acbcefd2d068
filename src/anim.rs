/// Transition animation machinery — typed interpolation channels grouped
/// into a staged composite run.
///
/// Each track is a pure keyframe curve `eased fraction -> value`; the
/// composite plays one stage at a time, all tracks within a stage
/// concurrently, and reports `(channel, value)` updates per tick. Dropping
/// a composite mid-run cancels it with no settle pass.

/// Ease-out curve used by every channel.
pub fn decelerate(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv
}

/// The three animatable values of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Dash-phase progress of the in-transit line, 0..1.
    LineProgress,
    /// Radius of the current step's indicator dot.
    IndicatorRadius,
    /// Radius of the mid-transition check circle.
    CheckRadius,
}

/// Keyframe curve for one channel. Keys are evenly spaced over the track's
/// duration and interpolated piecewise-linearly over the eased fraction,
/// so a three-key track overshoots through its middle value.
#[derive(Clone, Debug)]
pub struct Track {
    pub channel: Channel,
    keys: Vec<f32>,
    duration_ms: f32,
}

impl Track {
    pub fn new(channel: Channel, keys: Vec<f32>, duration_ms: u32) -> Track {
        debug_assert!(keys.len() >= 2);
        Track {
            channel,
            keys,
            duration_ms: duration_ms as f32,
        }
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Value at an eased fraction in 0..=1.
    fn value_at(&self, eased: f32) -> f32 {
        let segments = (self.keys.len() - 1) as f32;
        let pos = eased.clamp(0.0, 1.0) * segments;
        let idx = (pos.floor() as usize).min(self.keys.len() - 2);
        let local = pos - idx as f32;
        self.keys[idx] + (self.keys[idx + 1] - self.keys[idx]) * local
    }
}

struct TrackState {
    track: Track,
    elapsed_ms: f32,
    done: bool,
}

/// One transition's worth of sub-animations. Stages run sequentially;
/// tracks within a stage run concurrently.
pub struct Composite {
    stages: Vec<Vec<TrackState>>,
    stage: usize,
}

impl Composite {
    pub fn new(stages: Vec<Vec<Track>>) -> Composite {
        Composite {
            stages: stages
                .into_iter()
                .map(|tracks| {
                    tracks
                        .into_iter()
                        .map(|track| TrackState {
                            track,
                            elapsed_ms: 0.0,
                            done: false,
                        })
                        .collect()
                })
                .collect(),
            stage: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stage < self.stages.len()
    }

    /// Whether the channel's track is in the active stage and unfinished.
    pub fn channel_running(&self, channel: Channel) -> bool {
        self.stages
            .get(self.stage)
            .map(|tracks| {
                tracks
                    .iter()
                    .any(|t| t.track.channel == channel && !t.done)
            })
            .unwrap_or(false)
    }

    /// Advance by `dt_ms`, returning every `(channel, value)` update this
    /// tick produced. The next stage begins on the following tick once
    /// every track in the active stage has finished.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<(Channel, f32)> {
        let mut updates = Vec::new();
        let Some(tracks) = self.stages.get_mut(self.stage) else {
            return updates;
        };

        for state in tracks.iter_mut() {
            if state.done {
                continue;
            }
            state.elapsed_ms += dt_ms;
            let fraction = if state.track.duration_ms <= 0.0 {
                1.0
            } else {
                (state.elapsed_ms / state.track.duration_ms).min(1.0)
            };
            updates.push((state.track.channel, state.track.value_at(decelerate(fraction))));
            if fraction >= 1.0 {
                state.done = true;
            }
        }

        if tracks.iter().all(|t| t.done) {
            self.stage += 1;
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decelerate_is_monotonic_ease_out() {
        assert_eq!(decelerate(0.0), 0.0);
        assert_eq!(decelerate(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=10 {
            let v = decelerate(i as f32 / 10.0);
            assert!(v >= prev);
            prev = v;
        }
        // Ease-out: front-loaded.
        assert!(decelerate(0.5) > 0.5);
    }

    #[test]
    fn two_key_track_interpolates_linearly_over_eased_time() {
        let track = Track::new(Channel::LineProgress, vec![1.0, 0.0], 100);
        assert_eq!(track.value_at(0.0), 1.0);
        assert_eq!(track.value_at(1.0), 0.0);
        assert!((track.value_at(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn three_key_track_overshoots_through_middle() {
        let track = Track::new(Channel::CheckRadius, vec![7.0, 20.8, 16.0], 100);
        assert_eq!(track.value_at(0.0), 7.0);
        assert!((track.value_at(0.5) - 20.8).abs() < 1e-4);
        assert_eq!(track.value_at(1.0), 16.0);
    }

    #[test]
    fn stage_gates_until_all_tracks_finish() {
        // Line runs twice as long as check, indicator waits for both.
        let mut composite = Composite::new(vec![
            vec![
                Track::new(Channel::LineProgress, vec![1.0, 0.0], 200),
                Track::new(Channel::CheckRadius, vec![0.0, 1.0], 100),
            ],
            vec![Track::new(Channel::IndicatorRadius, vec![0.0, 1.0], 100)],
        ]);

        assert!(composite.channel_running(Channel::LineProgress));
        assert!(!composite.channel_running(Channel::IndicatorRadius));

        let updates = composite.tick(100.0);
        // Check finished, line halfway; indicator still waiting.
        assert!(composite.channel_running(Channel::LineProgress));
        assert!(!composite.channel_running(Channel::CheckRadius));
        assert!(!composite.channel_running(Channel::IndicatorRadius));
        assert!(updates.iter().any(|(ch, _)| *ch == Channel::LineProgress));
        assert!(updates
            .iter()
            .all(|(ch, _)| *ch != Channel::IndicatorRadius));

        composite.tick(100.0); // line finishes, stage advances
        assert!(composite.channel_running(Channel::IndicatorRadius));

        let updates = composite.tick(100.0);
        assert_eq!(updates, vec![(Channel::IndicatorRadius, 1.0)]);
        assert!(!composite.is_running());
        assert!(composite.tick(16.0).is_empty());
    }

    #[test]
    fn sequential_stages_play_in_order() {
        let mut composite = Composite::new(vec![
            vec![Track::new(Channel::IndicatorRadius, vec![1.0, 0.0], 50)],
            vec![Track::new(Channel::LineProgress, vec![0.0, 1.0], 100)],
            vec![Track::new(Channel::CheckRadius, vec![1.0, 0.5], 50)],
        ]);

        let order: Vec<Channel> = std::iter::from_fn(|| {
            let updates = composite.tick(1000.0);
            updates.first().map(|(ch, _)| *ch)
        })
        .collect();
        assert_eq!(
            order,
            vec![
                Channel::IndicatorRadius,
                Channel::LineProgress,
                Channel::CheckRadius
            ]
        );
    }

    #[test]
    fn final_tick_lands_exactly_on_last_key() {
        let mut composite =
            Composite::new(vec![vec![Track::new(Channel::LineProgress, vec![1.0, 0.0], 90)]]);
        let mut last = f32::NAN;
        while composite.is_running() {
            for (_, v) in composite.tick(16.0) {
                last = v;
            }
        }
        assert_eq!(last, 0.0);
    }
}
