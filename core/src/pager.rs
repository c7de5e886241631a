/// Space left for the arrow gutters when paging by one screen.
pub const ARROW_GUTTER: f32 = 80.0;

/// Horizontal paging state owned by a single row.
///
/// The scroll area reports its real offset and sizes every frame through
/// [`ScrollPager::observe`]; arrow clicks queue a jump that the renderer
/// picks up with [`ScrollPager::take_jump`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPager {
    offset: f32,
    viewport: f32,
    content: f32,
    jump: Option<f32>,
}

impl ScrollPager {
    pub fn observe(&mut self, offset: f32, viewport: f32, content: f32) {
        self.viewport = viewport.max(0.0);
        self.content = content.max(0.0);
        if self.jump.is_none() {
            self.offset = offset.clamp(0.0, self.max_offset());
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.content - self.viewport).max(0.0)
    }

    fn step(&self) -> f32 {
        (self.viewport - ARROW_GUTTER).max(1.0)
    }

    pub fn can_page_left(&self) -> bool {
        self.offset > 0.0
    }

    pub fn can_page_right(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub fn page_left(&mut self) -> f32 {
        self.move_to(self.offset - self.step())
    }

    pub fn page_right(&mut self) -> f32 {
        self.move_to(self.offset + self.step())
    }

    fn move_to(&mut self, target: f32) -> f32 {
        self.offset = target.clamp(0.0, self.max_offset());
        self.jump = Some(self.offset);
        self.offset
    }

    pub fn take_jump(&mut self) -> Option<f32> {
        self.jump.take()
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.jump = Some(0.0);
    }
}
