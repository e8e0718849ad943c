/// Round-robin position in each selection dimension.
///
/// Counters are independent and may exceed the size of their pool after the
/// pool shrinks; readers always reduce them modulo the current size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    pub subtopic: usize,
    pub question_type: usize,
    pub difficulty: usize,
}

/// Current cardinality of each candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    pub subtopics: usize,
    pub question_types: usize,
    pub difficulties: usize,
}

fn step(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

impl RotationCursor {
    /// Advance every dimension by one, wrapping at its pool size.
    pub fn advance(&mut self, pools: PoolSizes) {
        self.subtopic = step(self.subtopic, pools.subtopics);
        self.question_type = step(self.question_type, pools.question_types);
        self.difficulty = step(self.difficulty, pools.difficulties);
    }

    /// Restart type and difficulty rotation; topic coverage is kept.
    pub fn restart_dimensions(&mut self) {
        self.question_type = 0;
        self.difficulty = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools(subtopics: usize, question_types: usize, difficulties: usize) -> PoolSizes {
        PoolSizes {
            subtopics,
            question_types,
            difficulties,
        }
    }

    #[test]
    fn advance_wraps_each_dimension_independently() {
        let mut cursor = RotationCursor::default();
        cursor.advance(pools(3, 2, 5));
        cursor.advance(pools(3, 2, 5));
        assert_eq!(
            cursor,
            RotationCursor {
                subtopic: 2,
                question_type: 0,
                difficulty: 2
            }
        );
    }

    #[test]
    fn shrunken_pool_brings_counter_back_in_range() {
        let mut cursor = RotationCursor {
            subtopic: 0,
            question_type: 7,
            difficulty: 4,
        };
        cursor.advance(pools(1, 2, 0));
        assert_eq!(cursor.subtopic, 0);
        assert_eq!(cursor.question_type, 0);
        assert_eq!(cursor.difficulty, 0);
    }

    #[test]
    fn restart_keeps_subtopic() {
        let mut cursor = RotationCursor {
            subtopic: 3,
            question_type: 1,
            difficulty: 2,
        };
        cursor.restart_dimensions();
        assert_eq!(cursor.subtopic, 3);
        assert_eq!(cursor.question_type, 0);
        assert_eq!(cursor.difficulty, 0);

        cursor.reset();
        assert_eq!(cursor, RotationCursor::default());
    }
}
