pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The original implementation of the Chip-8 language used a 64x32-pixel monochrome display with this format:
/// ( 0, 0)   (63, 0)
/// ( 0,31)   (63,31)
///
/// Pixels are stored one byte each, row-major, and only ever hold 0 or 1.
#[derive(Debug)]
pub struct Display([u8; DISPLAY_WIDTH * DISPLAY_HEIGHT]);

impl Display {
    pub fn new() -> Self {
        Display([0; DISPLAY_WIDTH * DISPLAY_HEIGHT])
    }

    pub fn clear(&mut self) {
        self.0.fill(0);
    }

    /// Reads the pixel at linear index `x + y * 64`.
    pub fn read_pixel(&self, idx: usize) -> u8 {
        self.0[idx]
    }

    /// Writes the pixel at linear index `x + y * 64`. Any non-zero value turns it on.
    pub fn write_pixel(&mut self, idx: usize, value: u8) {
        self.0[idx] = u8::from(value != 0);
    }

    /// Reads the pixel at (`x`, `y`), wrapping both coordinates onto the screen.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.read_pixel(self.compute_idx(x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT))
    }

    /// Toggles the pixel at position (`x`, `y`), wrapping both coordinates onto
    /// the screen, and returns `true` if the pixel was on before.
    pub fn xor_pixel(&mut self, x: usize, y: usize) -> bool {
        let idx = self.compute_idx(x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT);
        let last_value = self.read_pixel(idx);
        self.write_pixel(idx, last_value ^ 1);

        last_value == 1
    }

    pub fn compute_idx(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    pub fn pixels(&self) -> &[u8] {
        &self.0
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
