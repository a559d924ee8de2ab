//! Channel-major views over raw detection output tensors.
//!
//! `ChannelView` is a borrowed `[84][N]` accessor over the flat output
//! buffer of one inference call. Layout differences between model exports
//! (`[84,N]`, `[N,84]`, with or without a leading batch axis of 1) are
//! absorbed by strides, so no element is copied or transposed.

/// Channels per anchor: 4 box coordinates plus 80 score channels.
pub const CHANNELS: usize = 84;

/// Leading box-coordinate channels (`cx`, `cy`, `w`, `h`).
pub const COORD_CHANNELS: usize = 4;

/// Borrowed channel-major view over a raw output tensor.
#[derive(Copy, Clone)]
pub struct ChannelView<'a> {
    data: &'a [f32],
    anchors: usize,
    channel_stride: usize,
    anchor_stride: usize,
}

impl<'a> ChannelView<'a> {
    /// Builds a channel-major view from a raw output shape and flat data.
    ///
    /// Accepts `[84,N]`, `[N,84]`, `[1,84,N]` and `[1,N,84]`; when both
    /// axes are 84 the leading axis is taken as the channel axis. Returns
    /// `None` when no non-batch axis equals [`CHANNELS`], the batch axis
    /// is not 1, or the buffer is shorter than the shape requires. A
    /// mismatched model export must degrade to "no detections this
    /// frame", so there is no panicking constructor.
    pub fn from_output(shape: &[usize], data: &'a [f32]) -> Option<Self> {
        let (rows, cols) = match *shape {
            [rows, cols] => (rows, cols),
            [1, rows, cols] => (rows, cols),
            _ => return None,
        };

        let (anchors, channel_stride, anchor_stride) = if rows == CHANNELS {
            (cols, cols, 1)
        } else if cols == CHANNELS {
            (rows, 1, CHANNELS)
        } else {
            return None;
        };

        if data.len() < rows.checked_mul(cols)? {
            return None;
        }

        Some(Self {
            data,
            anchors,
            channel_stride,
            anchor_stride,
        })
    }

    /// Returns the number of anchors `N`.
    pub fn anchors(&self) -> usize {
        self.anchors
    }

    /// Returns the value at `(channel, anchor)`.
    ///
    /// Valid for `channel < CHANNELS` and `anchor < anchors()`; the
    /// constructor guarantees the backing buffer covers that index range.
    #[inline]
    pub fn at(&self, channel: usize, anchor: usize) -> f32 {
        self.data[channel * self.channel_stride + anchor * self.anchor_stride]
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelView, CHANNELS};

    fn channel_major(n: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; CHANNELS * n];
        for channel in 0..CHANNELS {
            for anchor in 0..n {
                data[channel * n + anchor] = (channel * 1000 + anchor) as f32;
            }
        }
        data
    }

    #[test]
    fn reads_all_four_layouts_identically() {
        let n = 7;
        let cm = channel_major(n);
        let mut am = vec![0.0f32; CHANNELS * n];
        for channel in 0..CHANNELS {
            for anchor in 0..n {
                am[anchor * CHANNELS + channel] = cm[channel * n + anchor];
            }
        }

        let views = [
            ChannelView::from_output(&[CHANNELS, n], &cm).unwrap(),
            ChannelView::from_output(&[n, CHANNELS], &am).unwrap(),
            ChannelView::from_output(&[1, CHANNELS, n], &cm).unwrap(),
            ChannelView::from_output(&[1, n, CHANNELS], &am).unwrap(),
        ];

        for view in &views {
            assert_eq!(view.anchors(), n);
            assert_eq!(view.at(0, 0), 0.0);
            assert_eq!(view.at(83, 6), 83006.0);
            assert_eq!(view.at(4, 3), 4003.0);
        }
    }

    #[test]
    fn ambiguous_square_shape_prefers_leading_channel_axis() {
        let data = channel_major(CHANNELS);
        let view = ChannelView::from_output(&[CHANNELS, CHANNELS], &data).unwrap();
        assert_eq!(view.at(1, 0), 1000.0);
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let data = vec![0.0f32; 90_000];
        assert!(ChannelView::from_output(&[10, 9000], &data).is_none());
        assert!(ChannelView::from_output(&[1, 10, 9000], &data).is_none());
        assert!(ChannelView::from_output(&[2, CHANNELS, 100], &data).is_none());
        assert!(ChannelView::from_output(&[CHANNELS], &data).is_none());
        assert!(ChannelView::from_output(&[1, 1, CHANNELS, 100], &data).is_none());
    }

    #[test]
    fn rejects_short_buffer() {
        let data = vec![0.0f32; CHANNELS * 10 - 1];
        assert!(ChannelView::from_output(&[CHANNELS, 10], &data).is_none());
    }
}
