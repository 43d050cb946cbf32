use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_match3::core::{GameConfig, GameSnapshot, GameState};
use tui_match3::term::{FrameBuffer, GameView, Viewport};
use tui_match3::types::Coord;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn frame_loop_does_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut game = GameState::new(GameConfig::default()).unwrap();
    game.start_round(false);

    let view = GameView::default();
    let viewport = Viewport::new(40, 20);
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    // Warm-up sizes the snapshot rows and the framebuffer.
    game.snapshot_into(&mut snap);
    view.render_into(&snap, Some(Coord::new(0, 0)), viewport, &mut fb);
    let row0 = snap.rows[0].as_ptr();

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            let _ = game.on_tick(16);
            game.snapshot_into(&mut snap);
            view.render_into(&snap, Some(Coord::new(0, 0)), viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0, "frame loop allocated {allocs} times");
    assert_eq!(snap.rows[0].as_ptr(), row0);
}
