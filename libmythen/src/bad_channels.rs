// Bad channels are dead or noisy strips which are permanently excluded from any summing.
// They are addressed by (module, channel), where channel is the index within the module.
// The calibration for a detector usually lists them by global channel number instead, so
// BadChannelList can be built either way. In a file, a row with a single entry is a global
// channel number, counted with the Mythen's CHANNELS_PER_MODULE.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use bit_set::BitSet;

use super::constants::CHANNELS_PER_MODULE;
use super::error::BadChannelError;

const ENTRIES_PER_LINE: usize = 2; //module, channel
const GLOBAL_ENTRIES_PER_LINE: usize = 1; //global channel

/// Lookup for channels which must not contribute to a sum
pub trait BadChannelProvider {
    /// Returns true if the channel within the given module is bad
    fn is_bad(&self, module: usize, channel: usize) -> bool;
}

impl<F> BadChannelProvider for F
where
    F: Fn(usize, usize) -> bool,
{
    fn is_bad(&self, module: usize, channel: usize) -> bool {
        self(module, channel)
    }
}

/// A detector with every channel working
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBadChannels;

impl BadChannelProvider for NoBadChannels {
    fn is_bad(&self, _module: usize, _channel: usize) -> bool {
        false
    }
}

/// BadChannelList stores the bad channels of each module as a bit set.
///
/// It can be read from a CSV file with a `module,channel` header, one bad channel per row.
#[derive(Debug, Clone, Default)]
pub struct BadChannelList {
    modules: Vec<BitSet>,
}

impl BadChannelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the list from global channel numbers, as found in a detector calibration
    pub fn from_global_channels(channels: &[usize], channels_per_module: usize) -> Self {
        let mut list = Self::new();
        for global in channels {
            list.insert_global(*global, channels_per_module);
        }
        list
    }

    /// Read a bad channel CSV file
    pub fn read_file(path: &Path) -> Result<Self, BadChannelError> {
        if !path.exists() {
            return Err(BadChannelError::BadFilePath(path.to_path_buf()));
        }

        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;

        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, BadChannelError> {
        let mut list = Self::new();
        let mut lines = contents.lines().enumerate();
        lines.next(); // Skip the header
        for (idx, line) in lines {
            let line_number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let entries: Vec<&str> = line.split_terminator(",").map(|e| e.trim()).collect();
            if entries.len() != ENTRIES_PER_LINE && entries.len() != GLOBAL_ENTRIES_PER_LINE {
                return Err(BadChannelError::BadFileFormat(line_number));
            }

            let parse = |entry: &str| {
                entry
                    .parse::<usize>()
                    .map_err(|source| BadChannelError::ParsingError {
                        line: line_number,
                        source,
                    })
            };
            if entries.len() == GLOBAL_ENTRIES_PER_LINE {
                list.insert_global(parse(entries[0])?, CHANNELS_PER_MODULE);
            } else {
                let module = parse(entries[0])?;
                let channel = parse(entries[1])?;
                list.insert(module, channel);
            }
        }

        Ok(list)
    }

    /// Flag a channel as bad
    pub fn insert(&mut self, module: usize, channel: usize) {
        if self.modules.len() <= module {
            self.modules.resize_with(module + 1, BitSet::new);
        }
        self.modules[module].insert(channel);
    }

    /// Flag a channel given by its global channel number
    fn insert_global(&mut self, global: usize, channels_per_module: usize) {
        if channels_per_module == 0 {
            return;
        }
        self.insert(global / channels_per_module, global % channels_per_module);
    }

    /// Total number of bad channels across all modules
    pub fn len(&self) -> usize {
        self.modules.iter().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BadChannelProvider for BadChannelList {
    fn is_bad(&self, module: usize, channel: usize) -> bool {
        self.modules
            .get(module)
            .is_some_and(|bad| bad.contains(channel))
    }
}
