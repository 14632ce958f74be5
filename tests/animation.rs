mod tests {
    use shift_matrix::animation::{
        BinaryAnimation, BlinkAnimation, PingPongAnimation, PulseAnimation, RandomAnimation,
        SnakeAnimation, StarAnimation,
    };
    use shift_matrix::{Animation, AnimationId, AnimationSlot, Frame};

    /// Renders `steps` frames of a `rows` x `cols` matrix.
    fn render_frames(
        rows: usize,
        cols: usize,
        steps: usize,
        mut render: impl FnMut(&mut Frame<'_>),
    ) -> Vec<Vec<bool>> {
        let mut cells = vec![false; rows * cols];
        (0..steps)
            .map(|_| {
                render(&mut Frame::new(&mut cells, cols));
                cells.clone()
            })
            .collect()
    }

    fn frames(animation: &mut impl Animation, rows: usize, cols: usize, steps: usize) -> Vec<Vec<bool>> {
        render_frames(rows, cols, steps, |frame| animation.render(frame))
    }

    fn frames_of(slot: &mut AnimationSlot, rows: usize, cols: usize, steps: usize) -> Vec<Vec<bool>> {
        render_frames(rows, cols, steps, |frame| slot.render(frame))
    }

    fn slot_frames(id: AnimationId, rows: usize, cols: usize, steps: usize) -> Vec<Vec<bool>> {
        frames_of(&mut id.to_slot(7), rows, cols, steps)
    }

    fn lit(frame: &[bool]) -> Vec<usize> {
        frame
            .iter()
            .enumerate()
            .filter_map(|(index, on)| on.then_some(index))
            .collect()
    }

    #[test]
    fn test_frame_accessors() {
        let mut cells = [false; 6];
        let mut frame = Frame::new(&mut cells, 3);
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.cols(), 3);
        assert_eq!(frame.len(), 6);
        assert!(!frame.is_empty());

        frame.fill_with(|row, col| row == 1 && col == 2);
        assert!(frame.get(1, 2));
        assert!(!frame.get(0, 2));
        assert!(!frame.get(0, 5));
        assert!(!frame.get(9, 0));
    }

    #[test]
    fn test_blink_alternates_all_on_all_off() {
        let frames = frames(&mut BlinkAnimation::new(), 2, 2, 4);
        assert_eq!(frames[0], [true; 4]);
        assert_eq!(frames[1], [false; 4]);
        assert_eq!(frames[2], [true; 4]);
        assert_eq!(frames[3], [false; 4]);
    }

    #[test]
    fn test_left_to_right_lights_one_column() {
        let frames = slot_frames(AnimationId::LeftToRight, 2, 3, 4);
        assert_eq!(lit(&frames[0]), [0, 3]);
        assert_eq!(lit(&frames[1]), [1, 4]);
        assert_eq!(lit(&frames[2]), [2, 5]);
        assert_eq!(lit(&frames[3]), [0, 3]);
    }

    #[test]
    fn test_sequential_visits_every_cell() {
        let frames = slot_frames(AnimationId::Sequential, 2, 2, 5);
        let cursor: Vec<Vec<usize>> = frames.iter().map(|frame| lit(frame)).collect();
        assert_eq!(cursor, [vec![0], vec![1], vec![2], vec![3], vec![0]]);
    }

    #[test]
    fn test_ping_pong_bounces() {
        let frames = frames(&mut PingPongAnimation::new(), 1, 3, 7);
        let cols: Vec<usize> = frames.iter().map(|frame| lit(frame)[0]).collect();
        assert_eq!(cols, [0, 1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_ping_pong_shifts_by_row() {
        let frames = frames(&mut PingPongAnimation::new(), 3, 3, 1);
        // Row r lights column (cursor + r) mod cols.
        assert_eq!(lit(&frames[0]), [0, 4, 8]);
    }

    #[test]
    fn test_binary_counts_per_row() {
        let frames = frames(&mut BinaryAnimation::new(), 2, 3, 8);
        // Row 0 shows the counter, row 1 the counter plus one, MSB in column 0.
        assert_eq!(frames[0], [false, false, false, false, false, true]);
        assert_eq!(frames[1], [false, false, true, false, true, false]);
        assert_eq!(frames[2], [false, true, false, false, true, true]);
        assert_eq!(frames[7], [true, true, true, false, false, false]);
    }

    #[test]
    fn test_binary_wraps_counter() {
        let mut animation = BinaryAnimation::new();
        let frames = frames(&mut animation, 1, 2, 5);
        assert_eq!(frames[0], [false, false]);
        assert_eq!(frames[3], [true, true]);
        assert_eq!(frames[4], [false, false]);
    }

    #[test]
    fn test_radar_walks_linear_positions() {
        let frames = slot_frames(AnimationId::Radar, 2, 2, 5);
        let cursor: Vec<Vec<usize>> = frames.iter().map(|frame| lit(frame)).collect();
        assert_eq!(cursor, [vec![0], vec![1], vec![2], vec![3], vec![0]]);
    }

    #[test]
    fn test_snake_has_three_segments() {
        let frames = frames(&mut SnakeAnimation::new(), 1, 5, 3);
        assert_eq!(lit(&frames[0]), [0, 3, 4]);
        assert_eq!(lit(&frames[1]), [0, 1, 4]);
        assert_eq!(lit(&frames[2]), [0, 1, 2]);
    }

    #[test]
    fn test_star_alternates_parity() {
        let frames = frames(&mut StarAnimation::new(), 1, 4, 3);
        assert_eq!(frames[0], [false, true, false, true]);
        assert_eq!(frames[1], [true, false, true, false]);
        assert_eq!(frames[2], [false, true, false, true]);
    }

    #[test]
    fn test_pulse_expands_and_contracts() {
        let frames = frames(&mut PulseAnimation::new(), 1, 8, 9);
        let counts: Vec<usize> = frames.iter().map(|frame| lit(frame).len()).collect();
        assert_eq!(counts, [1, 2, 3, 4, 4, 3, 2, 1, 1]);
        assert_eq!(lit(&frames[2]), [0, 1, 2]);
    }

    #[test]
    fn test_random_holds_for_three_steps() {
        let frames = frames(&mut RandomAnimation::new(42), 8, 8, 12);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
        assert_eq!(frames[3], frames[4]);
        assert_eq!(frames[4], frames[5]);

        // 64 cells repeating the same pattern four times in a row is not plausible.
        let changed = (1..4).any(|block| frames[block * 3] != frames[0]);
        assert!(changed);
    }

    #[test]
    fn test_random_is_reproducible() {
        let first = frames(&mut RandomAnimation::new(9), 4, 4, 6);
        let second = frames(&mut RandomAnimation::new(9), 4, 4, 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_restarts_from_first_frame() {
        for id in AnimationId::ALL {
            let mut slot = id.to_slot(3);
            let expected = frames_of(&mut slot, 2, 4, 2);
            slot.reset();
            let again = frames_of(&mut slot, 2, 4, 2);
            assert_eq!(expected, again, "{}", id.as_str());
        }
    }

    #[test]
    fn test_animation_names() {
        let names: Vec<&str> = AnimationId::ALL.iter().map(|id| id.as_str()).collect();
        assert_eq!(
            names,
            [
                "blink",
                "left-to-right",
                "sequential",
                "ping-pong",
                "binary",
                "radar",
                "snake",
                "random",
                "star",
                "pulse",
            ]
        );
        for id in AnimationId::ALL {
            assert_eq!(AnimationId::parse_from_str(id.as_str()), Some(id));
            assert_eq!(AnimationId::from_raw(id as u8), Some(id));
            assert_eq!(id.to_slot(0).id(), id);
        }
    }

    #[test]
    fn test_unknown_animation_falls_back_to_blink() {
        assert_eq!(AnimationId::parse_from_str("sparkle"), None);
        assert_eq!(AnimationId::parse_or_default("sparkle"), AnimationId::Blink);
        assert_eq!(AnimationId::parse_or_default("snake"), AnimationId::Snake);
        assert_eq!(AnimationId::from_raw(10), None);
        assert_eq!(AnimationSlot::default().id(), AnimationId::Blink);
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut id = AnimationId::Star;
        let mut seen = Vec::new();
        for _ in 0..10 {
            id = id.next();
            seen.push(id);
        }
        assert_eq!(id, AnimationId::Star);
        for expected in AnimationId::ALL {
            assert_eq!(seen.iter().filter(|id| **id == expected).count(), 1);
        }
        assert_eq!(AnimationId::Pulse.next(), AnimationId::Blink);
    }
}
