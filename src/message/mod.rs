#![doc = r#"
Status bytes and the messages they introduce

# Hierarchy
```text
                 |-------------|
                 | Status Byte |
                 |-------------|
             /          |          \
|-----------------|  |-------|  |------|
| Channel Voice   |  | SysEx |  | Meta |
| (0x80 - 0xEF)   |  | F0/F7 |  |  FF  |
|-----------------|  |-------|  |------|
```

Channel voice statuses establish a running status; every other status clears it.
"#]

mod status;
pub use status::*;

mod voice;
pub use voice::*;
