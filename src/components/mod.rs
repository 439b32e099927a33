pub mod dijkstra_canvas;
