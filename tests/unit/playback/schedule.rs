use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn build(seq: &Sequence, cfg: &PlaybackConfig, ready: bool) -> Schedule {
    let image_ready = move |_: usize| ready;
    let env = ScheduleEnv {
        cfg,
        viewport_width: 1280.0,
        image_ready: &image_ready,
    };
    build_schedule(seq, &env)
}

#[test]
fn single_cut_is_one_hold() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![Cut::image("a.png").with_hold(2.5)]).unwrap();
    let s = build(&seq, &cfg, true);
    assert!(close(s.timeline.duration(), 2.5));
    assert_eq!(s.plan.cuts.len(), 1);
    assert!(s.plan.cuts[0].transition.is_none());
    assert_eq!(s.timeline.sample_target(TargetId::Cut(0), 0.0).opacity, 1.0);
    let cues: Vec<_> = s.timeline.cues().map(|(_, c)| *c).collect();
    assert_eq!(cues, vec![TimelineCue::Enter { cut: 0 }]);
}

#[test]
fn basic_pair_holds_then_crossfades() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_hold(2.0),
        Cut::image("b.png").with_hold(3.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let tl = &s.timeline;
    assert!(close(tl.duration(), 6.0));

    let at0 = tl.sample(0.0);
    assert_eq!(at0[&TargetId::Cut(0)].opacity, 1.0);
    assert_eq!(at0[&TargetId::Cut(1)].opacity, 0.0);
    assert_eq!(tl.sample_target(TargetId::Cut(0), 2.0).opacity, 1.0);

    let at3 = tl.sample(3.0);
    assert_eq!(at3[&TargetId::Cut(0)].opacity, 0.0);
    assert_eq!(at3[&TargetId::Cut(1)].opacity, 1.0);

    let window = s.plan.cuts[0].transition.as_ref().unwrap();
    assert!(close(window.start, 2.0) && close(window.end, 3.0));
    assert!(close(s.plan.cuts[1].hold_start, 3.0));
    assert!(close(s.plan.cuts[1].hold_end, 6.0));
}

#[test]
fn exited_cut_drops_below_resting_cuts() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_hold(1.0),
        Cut::image("b.png").with_hold(1.0),
        Cut::image("c.png").with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let tl = &s.timeline;
    assert_eq!(tl.sample_target(TargetId::Cut(0), 0.0).z_index, 1003);
    assert_eq!(tl.sample_target(TargetId::Cut(1), 0.0).z_index, 1002);
    assert_eq!(tl.sample_target(TargetId::Cut(2), 0.0).z_index, 1001);
    assert_eq!(tl.sample_target(TargetId::Cut(0), 2.0).z_index, 3);
    assert_eq!(tl.sample_target(TargetId::Cut(1), 4.0).z_index, 2);
    // Z is applied on an instant, never interpolated.
    assert_eq!(tl.sample_target(TargetId::Cut(0), 1.5).z_index, 1003);
}

#[test]
fn slice_exit_forces_delayed_zoom_entrance() {
    let cfg = PlaybackConfig {
        slice_duration_factor: 1.0,
        ..PlaybackConfig::default()
    };
    let seq = Sequence::new(vec![
        Cut::image("a.png")
            .with_hold(1.0)
            .with_out_effect(OutEffect::Slice),
        Cut::image("b.png")
            .with_in_effect(AnimationType::Parallax)
            .with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let tl = &s.timeline;
    let window = s.plan.cuts[0].transition.as_ref().unwrap();
    assert!(window.forced_entrance);
    assert!(close(window.exit_end, 2.0));
    assert!(close(window.entrance_start, 2.0));
    assert!(close(tl.duration(), 4.0));

    assert_eq!(tl.sample_target(TargetId::Cut(1), 1.5).opacity, 0.0);
    assert_eq!(tl.sample_target(TargetId::Cut(1), 2.0).scale, 0.5);
    let shown = tl.sample_target(TargetId::Cut(1), 3.0);
    assert_eq!((shown.opacity, shown.scale), (1.0, 1.0));

    let left = tl.sample_target(TargetId::Slice { cut: 0, half: 0 }, 2.0);
    let right = tl.sample_target(TargetId::Slice { cut: 0, half: 1 }, 2.0);
    assert_eq!((left.shift.x, right.shift.x), (-0.5, 0.5));
    assert_eq!(tl.sample_target(TargetId::Cut(0), 2.0).opacity, 0.0);

    let cues: Vec<_> = tl.cues().map(|(t, c)| (t, *c)).collect();
    assert!(cues.contains(&(
        1.0,
        TimelineCue::MountStrips {
            cut: 0,
            variant: StripVariant::Slice,
            count: 2
        }
    )));
    assert!(cues.contains(&(2.0, TimelineCue::ReleaseStrips { cut: 0 })));
}

#[test]
fn chained_slices_each_force_the_next_entrance() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_out_effect(OutEffect::Slice),
        Cut::image("b.png")
            .with_in_effect(AnimationType::Morphing)
            .with_out_effect(OutEffect::Slice),
        Cut::image("c.png").with_in_effect(AnimationType::Physics),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    assert!(s.plan.cuts[0].transition.as_ref().unwrap().forced_entrance);
    assert!(s.plan.cuts[1].transition.as_ref().unwrap().forced_entrance);
}

#[test]
fn shutter_entrance_staggers_strips_and_delays_next_hold() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_hold(1.0),
        Cut::image("b.png")
            .with_in_effect(AnimationType::Shutter)
            .with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let tl = &s.timeline;
    assert!(close(s.plan.cuts[1].hold_start, 2.2));
    assert_eq!(tl.sample_target(TargetId::Content(1), 3.0).opacity, 0.0);
    assert_eq!(tl.sample_target(TargetId::Cut(1), 1.0).opacity, 1.0);
    let first = TargetId::Strip { cut: 1, index: 0 };
    let last = TargetId::Strip { cut: 1, index: 14 };
    assert_eq!(tl.sample_target(first, 0.5).shift.y, 1.0);
    assert_eq!(tl.sample_target(first, 1.5).shift.y, 0.0);
    assert!(tl.sample_target(last, 1.5).shift.y > 0.0);
    assert_eq!(tl.sample_target(last, 2.2).shift.y, 0.0);
}

#[test]
fn shutter_without_image_falls_back_to_container() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_out_effect(OutEffect::ShutterOut),
        Cut::image("b.png").with_in_effect(AnimationType::Shutter),
    ])
    .unwrap();
    let s = build(&seq, &cfg, false);
    let window = s.plan.cuts[0].transition.as_ref().unwrap();
    assert!(close(window.exit_end, window.start + 1.0));
    assert!(close(window.entrance_end, window.start + 1.0));
    assert!(
        !s.timeline
            .cues()
            .any(|(_, c)| matches!(c, TimelineCue::MountStrips { .. }))
    );
}

#[test]
fn synthesized_shutter_exit_uses_viewport_strip_count() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_out_effect(OutEffect::ShutterOut),
        Cut::image("b.png"),
    ])
    .unwrap();
    let ready = |_: usize| true;
    for (width, count) in [(1280.0, 15usize), (600.0, 10)] {
        let env = ScheduleEnv {
            cfg: &cfg,
            viewport_width: width,
            image_ready: &ready,
        };
        let s = build_schedule(&seq, &env);
        let mount = s
            .timeline
            .cues()
            .find_map(|(_, c)| match c {
                TimelineCue::MountStrips { count, .. } => Some(*count),
                _ => None,
            })
            .unwrap();
        assert_eq!(mount, count);
        let window = s.plan.cuts[0].transition.as_ref().unwrap();
        let tail = cfg.strip_stagger_secs * (count - 1) as f64;
        assert!(close(window.exit_end, window.start + 1.0 + tail));
        let even = s
            .timeline
            .sample_target(TargetId::Strip { cut: 0, index: 0 }, window.exit_end);
        let odd = s
            .timeline
            .sample_target(TargetId::Strip { cut: 0, index: 1 }, window.exit_end);
        assert_eq!((even.shift.y, odd.shift.y), (-1.0, 1.0));
    }
}

#[test]
fn encounter_halts_before_its_entrance() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_hold(1.0),
        Cut::encounter().with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let window = s.plan.cuts[0].transition.as_ref().unwrap();
    assert!(window.encounter);
    let first_at_t0: Vec<_> = s
        .timeline
        .cues()
        .filter(|(t, _)| close(*t, 1.0))
        .map(|(_, c)| *c)
        .collect();
    assert_eq!(first_at_t0[0], TimelineCue::Encounter { cut: 1 });
    assert_eq!(s.plan.cuts[1].kind, "encounter");
}

#[test]
fn opening_encounter_halts_before_the_first_enter() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::encounter().with_hold(1.0),
        Cut::image("a.png").with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let cues: Vec<_> = s.timeline.cues().take(2).map(|(t, c)| (t, *c)).collect();
    assert_eq!(
        cues,
        vec![
            (0.0, TimelineCue::Encounter { cut: 0 }),
            (0.0, TimelineCue::Enter { cut: 0 }),
        ]
    );
    assert!(!s.plan.cuts[0].transition.as_ref().unwrap().encounter);

    let lone = Sequence::new(vec![Cut::encounter().with_hold(1.0)]).unwrap();
    let s = build(&lone, &cfg, true);
    let cues: Vec<_> = s.timeline.cues().map(|(_, c)| *c).collect();
    assert_eq!(
        cues,
        vec![TimelineCue::Encounter { cut: 0 }, TimelineCue::Enter { cut: 0 }]
    );
}

#[test]
fn shutter_cut_releases_its_strips_whatever_the_exit() {
    let cfg = PlaybackConfig::default();
    for out in [OutEffect::FadeOut, OutEffect::ZoomOut, OutEffect::SlideOut] {
        let seq = Sequence::new(vec![
            Cut::image("a.png")
                .with_in_effect(AnimationType::Shutter)
                .with_out_effect(out)
                .with_hold(1.0),
            Cut::image("b.png"),
        ])
        .unwrap();
        let s = build(&seq, &cfg, true);
        let window = s.plan.cuts[0].transition.as_ref().unwrap();
        assert!(
            s.timeline.cues().any(|(t, c)| {
                *c == TimelineCue::ReleaseStrips { cut: 0 } && close(t, window.exit_end)
            }),
            "{out:?}"
        );
    }

    let plain = Sequence::new(vec![Cut::image("a.png"), Cut::image("b.png")]).unwrap();
    let s = build(&plain, &cfg, true);
    assert!(
        !s.timeline
            .cues()
            .any(|(_, c)| matches!(c, TimelineCue::ReleaseStrips { .. }))
    );
}

#[test]
fn ripple_fades_content_not_container() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![
        Cut::image("a.png").with_hold(1.0),
        Cut::image("b.png")
            .with_in_effect(AnimationType::Ripple)
            .with_hold(1.0),
    ])
    .unwrap();
    let s = build(&seq, &cfg, true);
    let tl = &s.timeline;
    assert_eq!(tl.sample_target(TargetId::Content(1), 0.0).distortion, 90.0);
    assert_eq!(tl.sample_target(TargetId::Cut(1), 1.0).opacity, 1.0);
    let mid = tl.sample_target(TargetId::Content(1), 1.6);
    assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
    assert!(mid.distortion > 0.0 && mid.distortion < 90.0);
    assert!(close(s.plan.cuts[1].hold_start, 2.2));
}

#[test]
fn out_of_range_entrance_is_a_slow_fade() {
    let cfg = PlaybackConfig::default();
    let seq = Sequence::new(vec![Cut::image("a.png")]).unwrap();
    let e = planned_entrance(&seq, OutEffect::FadeOut, 7, &cfg);
    assert_eq!(e.duration_secs, 3.0);
    assert_eq!(e.style, EntranceStyle::Container);
    assert!(!e.forced);
}
