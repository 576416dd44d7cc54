// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod claims;
mod help;
mod tile_cost;
mod watch;
