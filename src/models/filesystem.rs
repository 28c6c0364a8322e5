/// Capacity of the filesystem holding the target path, captured once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsSnapshot {
    pub total_blocks: u64,
    pub avail_blocks: u64,
    /// Bytes per block, the unit `total_blocks` and `avail_blocks` are counted in.
    pub block_size:   u64,
    pub total_inodes: u64,
    pub avail_inodes: u64,
}

impl FsSnapshot {
    /// Estimated number of blocks a file of `size` bytes occupies: `1 + size / block_size`.
    ///
    /// Always at least one block, even for empty files. A zero block size is treated as one
    /// byte per block so a broken statvfs never divides by zero.
    pub fn footprint(&self, size: u64) -> u64 {
        1 + size / self.block_size.max(1)
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_blocks.saturating_mul(self.block_size)
    }

    pub fn avail_bytes(&self) -> u64 {
        self.avail_blocks.saturating_mul(self.block_size)
    }

    pub fn avail_pct(&self) -> f64 {
        if self.total_blocks == 0 { return 0.0; }
        self.avail_blocks as f64 / self.total_blocks as f64 * 100.0
    }

    pub fn avail_inode_pct(&self) -> f64 {
        if self.total_inodes == 0 { return 0.0; }
        self.avail_inodes as f64 / self.total_inodes as f64 * 100.0
    }
}

/// Blocks and inodes still needed to reach the configured free targets.
///
/// Zero or negative on a dimension means that target is already met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deficit {
    pub blocks: i64,
    pub inodes: i64,
}

impl Deficit {
    pub fn is_cleared(&self) -> bool {
        self.blocks <= 0 && self.inodes <= 0
    }

    /// Account for one deleted file of `blocks` footprint.
    pub fn relieve(&mut self, blocks: u64) {
        self.blocks = self.blocks.saturating_sub(saturate_i64(i128::from(blocks)));
        self.inodes = self.inodes.saturating_sub(1);
    }
}

/// Clamp a wide intermediate into `i64`, pinning at the bounds instead of wrapping.
pub fn saturate_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}
