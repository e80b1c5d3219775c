use serde::{Deserialize, Serialize};

use super::input_value::InputValue;

/// Memory order of a spatial input buffer.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Layout {
    /// NHWC, the channels of a cell are contiguous.
    ChannelLast,
    /// NCHW, the cells of a channel are contiguous.
    ChannelFirst,
}

impl Layout {
    pub fn from_use_nhwc(use_nhwc: bool) -> Self {
        if use_nhwc {
            Layout::ChannelLast
        } else {
            Layout::ChannelFirst
        }
    }

    pub fn is_nhwc(self) -> bool {
        self == Layout::ChannelLast
    }

    pub fn index(
        self,
        channel: usize,
        index: usize,
        channel_size: usize,
        num_channels: usize,
    ) -> usize {
        match self {
            Layout::ChannelLast => channel + (num_channels * index),
            Layout::ChannelFirst => (channel * channel_size) + index,
        }
    }
}

pub struct ConvInputBuilder<'input, T> {
    channel_size: usize,
    num_channels: usize,
    layout: Layout,
    input: &'input mut [T],
}

impl<'input, T: InputValue> ConvInputBuilder<'input, T> {
    pub fn new(channel_size: usize, layout: Layout, input: &mut [T]) -> ConvInputBuilder<'_, T> {
        assert_eq!(input.len() % channel_size, 0);

        let num_channels = input.len() / channel_size;

        ConvInputBuilder {
            channel_size,
            num_channels,
            layout,
            input,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn clear(&mut self) {
        self.input.fill(T::ZERO);
    }

    pub fn channel<'b>(&'b mut self, channel: usize) -> ChannelBuilder<'b, 'input, T> {
        assert!(
            channel < self.num_channels,
            "Cannot write to the provided channel: {} as it is out of range of the number of channels: {}",
            channel,
            self.num_channels
        );

        ChannelBuilder {
            channel,
            channel_size: self.channel_size,
            input_builder: self,
        }
    }
}

pub struct ChannelBuilder<'builder, 'input, T> {
    channel: usize,
    channel_size: usize,
    input_builder: &'builder mut ConvInputBuilder<'input, T>,
}

impl<T: InputValue> ChannelBuilder<'_, '_, T> {
    pub fn write_at_idx(&mut self, index: usize, value: T) {
        assert!(
            index < self.channel_size,
            "Cannot write to the provided index: {} as it is out of range of the channel: {}",
            index,
            self.channel_size
        );

        let builder = &mut *self.input_builder;
        let input_idx = builder.layout.index(
            self.channel,
            index,
            self.channel_size,
            builder.num_channels,
        );
        builder.input[input_idx] = value;
    }

    pub fn set_bits_at_indexes<I>(&mut self, indexes: I)
    where
        I: Iterator<Item = usize>,
    {
        indexes.for_each(|index| self.write_at_idx(index, T::ONE));
    }
}
