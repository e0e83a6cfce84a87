/// Byte order of the colour channels in a decoded [`Frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Clockwise rotation a frame needs before display, taken from container
/// metadata (display matrix or `rotate` tag).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Upright,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Orientation {
    /// Maps a rotation in degrees to the nearest quarter turn.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            45..=134 => Orientation::Rotate90,
            135..=224 => Orientation::Rotate180,
            225..=315 => Orientation::Rotate270,
            _ => Orientation::Upright,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Orientation::Upright => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }
}

/// A single decoded video frame: tightly packed 8-bit pixels in row-major
/// order, exactly as the decoder produced them.
///
/// Colour-order and orientation fix-ups happen when the frame joins a
/// [`FrameBatch`](crate::shared::frame_batch::FrameBatch), not here.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channel_order: ChannelOrder,
    orientation: Orientation,
    index: usize,
}

impl Frame {
    /// Wraps decoder output as-is. A buffer that does not hold
    /// `width * height * 3` bytes is rejected when the frame is converted
    /// for a batch.
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        Self {
            data,
            width,
            height,
            channel_order: ChannelOrder::Rgb,
            orientation: Orientation::Upright,
            index,
        }
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Index of this frame in the source stream.
    pub fn index(&self) -> usize {
        self.index
    }
}
