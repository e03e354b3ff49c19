use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use portable_pty::{ChildKiller, MasterPty, PtySize};

/// Input/control side of the PTY: write, resize, kill.
///
/// Cheap to clone; every clone lives on the session task.
#[derive(Clone)]
pub struct PtyHandle {
    inner: Rc<Inner>,
}

struct Inner {
    writer: RefCell<Option<Box<dyn Write + Send>>>,
    master: Box<dyn MasterPty + Send>,
    killer: RefCell<Box<dyn ChildKiller + Send + Sync>>,
}

impl PtyHandle {
    pub(crate) fn new(
        writer: Box<dyn Write + Send>,
        master: Box<dyn MasterPty + Send>,
        killer: Box<dyn ChildKiller + Send + Sync>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                writer: RefCell::new(Some(writer)),
                master,
                killer: RefCell::new(killer),
            }),
        }
    }

    /// Forward bytes to the child's input.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.writer.borrow_mut();
        let Some(writer) = writer.as_mut() else {
            return Ok(());
        };
        if bytes.is_empty() {
            return Ok(());
        }
        writer.write_all(bytes)?;
        writer.flush()
    }

    /// Update the window size; the child gets its SIGWINCH.
    pub fn resize(&self, cols: u16, rows: u16) -> anyhow::Result<()> {
        self.inner.master.resize(PtySize {
            rows: rows.max(1),
            cols: cols.max(1),
            pixel_width: 0,
            pixel_height: 0,
        })?;
        Ok(())
    }

    /// Make the child redraw at `cols`×`rows`.
    ///
    /// The kernel skips SIGWINCH when the size does not change, so the
    /// width is stepped down by one column and then restored.
    pub fn force_redraw(&self, cols: u16, rows: u16) -> anyhow::Result<()> {
        let narrower = if cols > 1 { cols - 1 } else { cols + 1 };
        self.resize(narrower, rows)?;
        self.resize(cols, rows)
    }

    /// Current window size as the child sees it.
    pub fn size(&self) -> anyhow::Result<(u16, u16)> {
        let size = self.inner.master.get_size()?;
        Ok((size.cols, size.rows))
    }

    /// Terminate the child. Its exit is still reported through the proxy.
    pub fn kill(&self) -> io::Result<()> {
        self.inner.killer.borrow_mut().kill()
    }

    /// Close the child's input (EOF on its stdin).
    pub fn close_writer(&self) {
        self.inner.writer.borrow_mut().take();
    }
}
